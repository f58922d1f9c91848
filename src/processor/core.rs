//! Fetch/decode/execute for a single instruction.

use super::{SimulationError, Simulation, StackFrame};
use crate::constants::MEMORY_SIZE;
use crate::instruction::{spec_for, Opcode};
use num_traits::FromPrimitive;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

/// Advances `sim` by exactly one instruction. On success, `sim`'s program
/// counter has already been advanced (or redirected by a jump/call/ret);
/// on error the caller is responsible for transitioning to `Stopped`.
pub fn step(sim: &mut Simulation) -> Result<StepOutcome, SimulationError> {
    // Widened to 16 bits per the engine's design: an 8-bit `pc + 1 > 256`
    // check is vacuously false on wraparound, which would silently hide a
    // runaway program counter.
    let pc = sim.program_counter();
    if pc as u16 + 1 > MEMORY_SIZE as u16 {
        return Err(SimulationError::MemoryOverflow);
    }

    let opcode_byte = sim.memory()[pc as usize];
    let operand1 = fetch(sim, pc.wrapping_add(1));
    let operand2 = fetch(sim, pc.wrapping_add(2));

    let opcode = Opcode::from_u8(opcode_byte).ok_or(SimulationError::InvalidOpcode)?;
    let spec = spec_for(opcode);

    let mut jumped = false;

    match opcode {
        Opcode::Halt => {
            sim.finish();
            return Ok(StepOutcome::Halted);
        }

        Opcode::Movi => {
            write_register(sim, operand1, operand2);
        }
        Opcode::Mov => {
            let value = read_register(sim, operand2);
            write_register(sim, operand1, value);
        }
        Opcode::Add => {
            let result = read_register(sim, operand1).wrapping_add(read_register(sim, operand2));
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }
        Opcode::Sub => {
            let result = read_register(sim, operand1).wrapping_sub(read_register(sim, operand2));
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }
        Opcode::And => {
            let result = read_register(sim, operand1) & read_register(sim, operand2);
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }
        Opcode::Eor => {
            let result = read_register(sim, operand1) ^ read_register(sim, operand2);
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }
        Opcode::Inc => {
            let result = read_register(sim, operand1).wrapping_add(1);
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }
        Opcode::Dec => {
            let result = read_register(sim, operand1).wrapping_sub(1);
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }

        Opcode::In => {
            let input = sim.input_port();
            write_register(sim, operand1, input);
        }
        Opcode::Out => {
            let value = read_register(sim, operand1);
            sim.set_output_port(value);
        }

        Opcode::Jp => {
            sim.set_program_counter(operand1);
            jumped = true;
        }
        Opcode::Jz => {
            if sim.zero_flag() {
                sim.set_program_counter(operand1);
                jumped = true;
            }
        }
        Opcode::Jnz => {
            if !sim.zero_flag() {
                sim.set_program_counter(operand1);
                jumped = true;
            }
        }

        Opcode::Rcall => {
            let target = operand1;
            if target == pc {
                // readtable: S0 = lookup_table[S7]
                let index = read_register(sim, 7);
                let value = sim.lookup_table()[index as usize];
                write_register(sim, 0, value);
            } else if target == pc.wrapping_add(1) {
                // wait1ms: block ~1 ms of wall-clock time.
                std::thread::sleep(Duration::from_millis(1));
            } else if target == pc.wrapping_add(2) {
                // readadc: S0 = floor(255 * analogue_input / 5.0)
                let fraction = sim.analogue_input() / crate::constants::ANALOGUE_INPUT_MAX;
                let scaled = (255.0 * fraction).floor();
                write_register(sim, 0, scaled.clamp(0.0, 255.0) as u8);
            } else {
                let return_pc = pc.wrapping_add(spec.size_bytes as u8);
                sim.push_frame(StackFrame {
                    return_pc,
                    saved_registers: *sim.registers(),
                });
                sim.set_program_counter(target);
                jumped = true;
            }
        }
        Opcode::Ret => {
            let frame = sim.pop_frame().ok_or(SimulationError::StackUnderflow)?;
            sim.set_program_counter(frame.return_pc);
            *sim.registers_mut() = frame.saved_registers;
            jumped = true;
        }

        Opcode::Shl => {
            let result = read_register(sim, operand1).wrapping_shl(1);
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }
        Opcode::Shr => {
            let result = read_register(sim, operand1) >> 1;
            write_register(sim, operand1, result);
            sim.set_zero_flag(result == 0);
        }
    }

    if !jumped {
        sim.set_program_counter(pc.wrapping_add(spec.size_bytes as u8));
    }

    Ok(StepOutcome::Continue)
}

fn fetch(sim: &Simulation, address: u8) -> u8 {
    sim.memory()[address as usize]
}

fn read_register(sim: &Simulation, index: u8) -> u8 {
    sim.registers()[index as usize % crate::constants::REGISTER_COUNT]
}

fn write_register(sim: &mut Simulation, index: u8, value: u8) {
    let index = index as usize % crate::constants::REGISTER_COUNT;
    sim.registers_mut()[index] = value;
}

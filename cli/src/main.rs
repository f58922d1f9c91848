#[macro_use]
extern crate clap;

use clap::Arg;
use mcu8::Simulation;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug)]
enum IOErrorContext {
    ReadInput,
    WriteDump,
}

#[derive(Debug)]
enum Error {
    Masm(masm::CompilerError),
    Simulation(mcu8::SimulationError),
    Io(std::io::Error, IOErrorContext, PathBuf),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IOErrorContext::ReadInput => "Reading input",
                    IOErrorContext::WriteDump => "Writing memory dump",
                },
                path.display(),
                err
            ),
            Error::Masm(err) => write!(f, "Assembling input failed: {}", err),
            Error::Simulation(err) => write!(f, "Program faulted: {}", err),
        }
    }
}

fn main() {
    let matches = app_from_crate!()
        .arg(
            Arg::with_name("INPUT")
                .help("Sets the .asm source file to run")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("dump")
                .short("d")
                .long("dump")
                .takes_value(true)
                .value_name("FILE")
                .help("Writes the assembled 512-byte memory image (code then lookup table) to FILE"),
        )
        .get_matches();

    let input = matches.value_of("INPUT").unwrap();
    let dump = matches.value_of("dump");

    if let Err(err) = run(input, dump) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn run(input: &str, dump: Option<&str>) -> Result<(), Error> {
    let input_path = Path::new(input);

    let source = read_source(input_path)?;

    let program = masm::parse(&source).map_err(Error::Masm)?;

    let mut sim = Simulation::new();
    masm::assemble(program, &mut sim).map_err(Error::Masm)?;

    if let Some(dump_path) = dump {
        write_dump(&sim, &PathBuf::from(dump_path))?;
    }

    sim.start();
    loop {
        match sim.iterate() {
            Ok(true) => continue,
            Ok(false) => break,
            Err(err) => return Err(Error::Simulation(err)),
        }
    }

    println!("registers: {:?}", sim.registers());
    println!("output port: {:#04X}", sim.output_port());
    println!("iterations: {}", sim.iteration());

    Ok(())
}

fn read_source(path: &Path) -> Result<String, Error> {
    let file = File::open(path)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
    let mut reader = BufReader::new(file);
    let mut source = String::new();
    reader
        .read_to_string(&mut source)
        .map_err(|err| Error::Io(err, IOErrorContext::ReadInput, path.to_owned()))?;
    Ok(source)
}

fn write_dump(sim: &Simulation, path: &PathBuf) -> Result<(), Error> {
    let mut file = File::create(path)
        .map_err(|err| Error::Io(err, IOErrorContext::WriteDump, path.clone()))?;
    file.write_all(sim.memory())
        .and_then(|_| file.write_all(sim.lookup_table()))
        .map_err(|err| Error::Io(err, IOErrorContext::WriteDump, path.clone()))
}

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use classfile::class_file::ClassFile;
use classfile::constants::ConstantPool;
use jvm_core::class_entry::ClassState;
use jvm_core::linker::link_class;
use jvm_core::loader::{load_class_from_file, load_class_from_jar};
use jvm_core::method_area::MethodArea;
use jvm_core::resolver::resolve_class;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and load Java class files", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a class file and print its structure.
    Dump {
        #[arg(value_name = "CLASS")]
        class_file: PathBuf,
    },
    /// Parse a class file and list its constant-pool entries.
    Pool {
        #[arg(value_name = "CLASS")]
        class_file: PathBuf,
    },
    /// Load and link one or more class files (or a jar), printing the
    /// resulting load state of each class.
    Load {
        #[arg(value_name = "INPUTS", required = true)]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = Args::parse();
    match args.command {
        Command::Dump { class_file } => dump(&class_file),
        Command::Pool { class_file } => pool(&class_file),
        Command::Load { inputs } => load(&inputs),
    }
}

fn dump(path: &PathBuf) -> Result<(), Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let class = ClassFile::from_bytes(&bytes, None)?;
    println!("{}", class.to_pretty_fmt());
    Ok(())
}

fn pool(path: &PathBuf) -> Result<(), Box<dyn Error>> {
    let bytes = fs::read(path)?;
    let class = ClassFile::from_bytes(&bytes, None)?;
    for (i, entry) in class.constant_pool.iter().enumerate() {
        if i == 0 {
            continue;
        }
        match entry {
            ConstantPool::Unknown => continue,
            ConstantPool::Utf8(u) => println!("#{i} = Utf8\t\t{}", String::from(u)),
            other => println!("#{i} = {other:?}"),
        }
    }
    Ok(())
}

/// Loads every input (a `.class` file is loaded by its own file stem as the
/// expected name; a `.jar` contributes every member it holds), then links
/// and resolves each loaded class, printing the resulting state. A class
/// whose superclass wasn't among the supplied inputs fails to link and is
/// reported rather than aborting the whole run.
fn load(inputs: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let area = MethodArea::new();
    let mut indices = Vec::new();

    for path in inputs {
        let is_jar = path.extension().map(|e| e == "jar").unwrap_or(false);
        if is_jar {
            indices.extend(load_class_from_jar(&area, path)?);
            continue;
        }
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();
        indices.push(load_class_from_file(&area, path, &name)?);
    }

    for &index in &indices {
        let name = area.name_of(index);
        let link_result = link_class(&area, index, &mut |_area, missing_name| {
            Err(format!("class {missing_name} referenced by {name} was not supplied").into())
                as Result<usize, Box<dyn Error>>
        });

        if let Err(e) = link_result {
            println!("{}: LOAD_FAILED ({e})", area.name_of(index));
            continue;
        }

        let mut resolve_missing = |area: &MethodArea, missing_name: &str| {
            area.index_of(missing_name)
                .ok_or_else(|| -> Box<dyn Error> {
                    format!("class {missing_name} not available for resolution").into()
                })
        };
        let resolve_result = resolve_class(&area, index, &mut resolve_missing);
        let state = area.with(index, |e| e.state);
        let name = area.name_of(index);
        match resolve_result {
            Ok(()) => println!("{name}: {state:?}"),
            Err(e) => println!("{name}: {state:?} (resolution incomplete: {e})"),
        }
    }

    for &index in &indices {
        let state = area.with(index, |e| e.state);
        if state < ClassState::Linked {
            println!("{}: never reached LINKED", area.name_of(index));
        }
    }

    Ok(())
}

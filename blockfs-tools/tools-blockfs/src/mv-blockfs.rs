use blockfs::FileSystem;
use blockfs_tool_lib::{geometry_from_arguments, Handler};
use clap::{App, Arg};
use std::process::exit;

fn main() {
    env_logger::init();

    let arguments = App::new("mv-blockfs")
        .version("0.1.0")
        .about("This program moves files and directories within a blockfs image.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image"),
        )
        .arg(
            Arg::with_name("source")
                .required(true)
                .takes_value(true)
                .help("The path to move"),
        )
        .arg(
            Arg::with_name("destination")
                .required(true)
                .takes_value(true)
                .help("The path to move to"),
        )
        .arg(
            Arg::with_name("block-size")
                .long("block-size")
                .takes_value(true)
                .help("The size of each block, e.g. 1KiB"),
        )
        .arg(
            Arg::with_name("blocks")
                .long("blocks")
                .takes_value(true)
                .help("The number of blocks"),
        )
        .get_matches();

    let path = match arguments.value_of("image") {
        Some(p) => p,
        None => {
            eprintln!("An image is required.");
            exit(1);
        }
    };

    let geometry = match geometry_from_arguments(
        arguments.value_of("block-size"),
        arguments.value_of("blocks"),
    ) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    let mut handler = match Handler::new(path) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    let mut fs = match FileSystem::open(&mut handler, geometry) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Disk opening error: {}", e);
            exit(1);
        }
    };

    let source = match arguments.value_of("source") {
        Some(p) => p,
        None => {
            eprintln!("A source path is required.");
            exit(1);
        }
    };

    let destination = match arguments.value_of("destination") {
        Some(p) => p,
        None => {
            eprintln!("A destination path is required.");
            exit(1);
        }
    };

    match fs.move_entry(source, destination) {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

use blockfs::FileSystem;
use blockfs_tool_lib::{export_file, geometry_from_arguments, Handler};
use clap::{App, Arg};
use std::io::Write;
use std::path::Path;
use std::process::exit;

fn parse_number(value: Option<&str>) -> u64 {
    return match value.map(|v| v.parse::<u64>()) {
        Some(Ok(n)) => n,
        _ => {
            eprintln!("Offset and length must be non negative numbers.");
            exit(1);
        }
    };
}

fn main() {
    env_logger::init();

    let arguments = App::new("read-blockfs")
        .version("0.1.0")
        .about("This program reads files from a blockfs image.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image"),
        )
        .arg(
            Arg::with_name("file")
                .required(true)
                .takes_value(true)
                .help("The path of the file to read"),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .takes_value(true)
                .conflicts_with("offset")
                .help("Export the file to this host path instead of printing it."),
        )
        .arg(
            Arg::with_name("offset")
                .long("offset")
                .takes_value(true)
                .requires("length")
                .help("The first byte to print"),
        )
        .arg(
            Arg::with_name("length")
                .long("length")
                .takes_value(true)
                .requires("offset")
                .help("The number of bytes to print"),
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

    let fs = match FileSystem::open(&mut handler, geometry) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Disk opening error: {}", e);
            exit(1);
        }
    };

    let file_name = match arguments.value_of("file") {
        Some(f) => f,
        None => {
            eprintln!("A file name is required to read.");
            exit(1);
        }
    };

    if let Some(output) = arguments.value_of("output") {
        match export_file(&fs, file_name, Path::new(output)) {
            Ok(n) => println!("Exported {} bytes to {}", n, output),
            Err(e) => {
                eprintln!("Error: {}", e);
                exit(1);
            }
        }

        return;
    }

    let contents = if arguments.is_present("offset") {
        let offset = parse_number(arguments.value_of("offset"));
        let length = parse_number(arguments.value_of("length"));

        match fs.read_range(file_name, offset, length) {
            Ok(Some(c)) => c,
            Ok(None) => Vec::new(),
            Err(e) => {
                eprintln!("An error occurred while reading file contents: {}", e);
                exit(1);
            }
        }
    } else {
        match fs.read(file_name) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("An error occurred while reading file contents: {}", e);
                exit(1);
            }
        }
    };

    match std::io::stdout().write_all(&contents) {
        Ok(_) => (),
        Err(e) => {
            eprintln!("Could not write the contents: {}", e);
            exit(1);
        }
    }
}

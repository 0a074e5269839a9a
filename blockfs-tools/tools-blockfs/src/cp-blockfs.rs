use blockfs::FileSystem;
use blockfs_tool_lib::{geometry_from_arguments, Handler};
use clap::{App, Arg};
use std::process::exit;

fn main() {
    env_logger::init();

    let arguments = App::new("cp-blockfs")
        .version("0.1.0")
        .about("This program copies files within a blockfs image.")
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
                .help("The file to copy"),
        )
        .arg(
            Arg::with_name("destination")
                .required(true)
                .takes_value(true)
                .help("The file or directory to copy to"),
        )
        .arg(
            Arg::with_name("append")
                .short("a")
                .long("append")
                .takes_value(false)
                .help("Append the source onto the destination instead of replacing it"),
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

    let result = if arguments.is_present("append") {
        fs.file_append(source, destination)
    } else {
        fs.file_copy(source, destination)
    };

    match result {
        Ok(n) => println!("Copied {} bytes", n),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

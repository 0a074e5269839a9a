use blockfs::FileSystem;
use blockfs_tool_lib::{geometry_from_arguments, Handler};
use clap::{App, Arg};
use std::process::exit;

fn main() {
    env_logger::init();

    let arguments = App::new("rm-blockfs")
        .version("0.1.0")
        .about("This program removes files and directories from a blockfs image.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image"),
        )
        .arg(
            Arg::with_name("path")
                .required(true)
                .takes_value(true)
                .help("The path of the file to remove"),
        )
        .arg(
            Arg::with_name("directory")
                .short("d")
                .long("directory")
                .takes_value(false)
                .help("Remove an empty directory instead of a file"),
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

    let path_in_image = match arguments.value_of("path") {
        Some(p) => p,
        None => {
            eprintln!("A path to remove is required.");
            exit(1);
        }
    };

    let result = if arguments.is_present("directory") {
        fs.delete_directory(path_in_image)
    } else {
        fs.delete_file(path_in_image)
    };

    match result {
        Ok(_) => println!("Removed {}", path_in_image),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

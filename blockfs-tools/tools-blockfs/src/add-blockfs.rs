use blockfs::FileSystem;
use blockfs_tool_lib::{geometry_from_arguments, import_file, Handler};
use clap::{App, Arg};
use std::path::Path;
use std::process::exit;

fn main() {
    env_logger::init();

    let arguments = App::new("add-blockfs")
        .version("0.1.0")
        .about("This program adds files to a blockfs image.")
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
                .help("The path of the file to add"),
        )
        .arg(
            Arg::with_name("name")
                .short("n")
                .long("name")
                .takes_value(true)
                .help("The path of the file as it should be stored in the blockfs image."),
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

    let file_path = match arguments.value_of("file") {
        Some(f) => f.to_string(),
        None => {
            eprintln!("A file to add is required.");
            exit(1);
        }
    };

    let name = match arguments.value_of("name") {
        Some(n) => n.to_string(),
        None => match Path::new(&file_path).file_name() {
            Some(n) => match n.to_str() {
                Some(n) => n.to_string(),
                None => {
                    eprintln!("Could not determine a file name to use for the image.");
                    exit(1);
                }
            },
            None => {
                eprintln!("Could not determine a file name to use for the image.");
                exit(1);
            }
        },
    };

    match import_file(&mut fs, Path::new(&file_path), &name) {
        Ok(n) => println!("Successfully added {} bytes as {}!", n, name),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

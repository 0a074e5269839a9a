use blockfs::FileSystem;
use blockfs_tool_lib::{geometry_from_arguments, u64_to_sized_string, Handler};
use clap::{App, Arg};
use log::info;
use std::process::exit;

fn main() {
    env_logger::init();

    let arguments = App::new("mkfs-blockfs")
        .version("0.1.0")
        .about("This program creates and formats a blockfs image.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image"),
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

    let mut handler = match Handler::open_or_create(path) {
        Ok(h) => h,
        Err(e) => {
            eprintln!("{}", e);
            exit(1);
        }
    };

    let fs = match FileSystem::make_new_filesystem(&mut handler, geometry) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Could not format the image: {}", e);
            exit(1);
        }
    };

    info!("formatted {}", path);

    let info = fs.disk_info();

    println!("Block size:     {}", u64_to_sized_string(info.block_size()));
    println!("Blocks:         {}", info.block_count());
    println!("Free blocks:    {}", info.free_block_count());
    println!(
        "Free space:     {}",
        u64_to_sized_string(info.free_block_space())
    );
    println!(
        "Max file size:  {}",
        u64_to_sized_string(info.max_file_size())
    );
}

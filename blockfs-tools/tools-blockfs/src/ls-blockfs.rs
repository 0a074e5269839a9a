use blockfs::FileSystem;
use blockfs_tool_lib::{geometry_from_arguments, u64_to_sized_string, Handler};
use clap::{App, Arg};
use std::process::exit;

const BLOCKS_PER_LINE: u64 = 64;

fn main() {
    env_logger::init();

    let arguments = App::new("ls-blockfs")
        .version("0.1.0")
        .about("This program lists files in a blockfs image.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image"),
        )
        .arg(
            Arg::with_name("path")
                .takes_value(true)
                .help("The directory or file to list, the root if omitted"),
        )
        .arg(
            Arg::with_name("blocks-status")
                .short("b")
                .takes_value(false)
                .help("Print the free block status instead of a listing."),
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

    if arguments.is_present("blocks-status") {
        let info = fs.disk_info();
        let table = fs.free_space();

        for block in 0..info.block_count() {
            if table.is_allocated(block) {
                print!("1");
            } else {
                print!("0");
            }

            if (block + 1) % BLOCKS_PER_LINE == 0 {
                println!();
            }
        }

        if info.block_count() % BLOCKS_PER_LINE != 0 {
            println!();
        }

        println!(
            "{} of {} blocks free ({})",
            info.free_block_count(),
            info.block_count(),
            u64_to_sized_string(info.free_block_space())
        );

        return;
    }

    let path_in_image = arguments.value_of("path").unwrap_or("");

    let lines = match fs.list(path_in_image) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    };

    for line in lines {
        println!("{}", line);
    }
}

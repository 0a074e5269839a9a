mod common;
extern crate blockfs;

use blockfs::{BlockFSError, FileSystem, Geometry};
use common::{allocated_blocks_match_reachable, Handler};

#[test]
fn test_file_copy() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 16)).unwrap();

    let content: Vec<u8> = (0..2100u32).map(|i| (i % 200) as u8).collect();

    fs.create_file("a").unwrap();
    fs.append("a", &content).unwrap();

    assert_eq!(fs.file_copy("a", "b").unwrap(), 2100);

    assert_eq!(fs.read("a").unwrap(), content);
    assert_eq!(fs.read("b").unwrap(), content);
    assert_eq!(fs.disk_info().free_block_count(), 8);
    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_file_copy_into_directory() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_directory("d").unwrap();
    fs.create_file("a").unwrap();
    fs.append("a", b"hello").unwrap();

    fs.file_copy("a", "d").unwrap();

    assert_eq!(fs.read("d/a").unwrap(), b"hello".to_vec());
    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_file_copy_overwrites() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_file("a").unwrap();
    fs.append("a", b"short").unwrap();
    fs.create_file("b").unwrap();
    fs.append("b", b"a much longer content").unwrap();

    fs.file_copy("a", "b").unwrap();
    assert_eq!(fs.read("b").unwrap(), b"short".to_vec());

    fs.file_copy("a", "a").unwrap();
    assert_eq!(fs.read("a").unwrap(), b"short".to_vec());
    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_file_copy_errors() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_directory("d").unwrap();

    assert_eq!(
        fs.file_copy("missing", "b"),
        Err(BlockFSError::NotFound(String::from("missing")))
    );
    assert_eq!(
        fs.file_copy("d", "b"),
        Err(BlockFSError::IsADirectory(String::from("d")))
    );
    assert!(!fs.exists_file("b").unwrap());
}

#[test]
fn test_file_append() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_file("a").unwrap();
    fs.append("a", b"tail").unwrap();
    fs.create_file("b").unwrap();
    fs.append("b", b"head-").unwrap();

    assert_eq!(fs.file_append("a", "b").unwrap(), 4);
    assert_eq!(fs.read("b").unwrap(), b"head-tail".to_vec());
    assert_eq!(fs.read("a").unwrap(), b"tail".to_vec());

    assert_eq!(
        fs.file_append("a", "c"),
        Err(BlockFSError::NotFound(String::from("c")))
    );

    fs.create_directory("d").unwrap();
    assert_eq!(
        fs.file_append("a", "d"),
        Err(BlockFSError::IsADirectory(String::from("d")))
    );
    assert_eq!(fs.read("a").unwrap(), b"tail".to_vec());
}

#[test]
fn test_file_copy_without_space_leaves_target() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    let content = vec![3u8; 3000];

    fs.create_file("a").unwrap();
    fs.append("a", &content).unwrap();
    fs.create_file("b").unwrap();
    fs.append("b", b"keep").unwrap();
    fs.create_file("d").unwrap();
    fs.append("d", b"x").unwrap();
    assert_eq!(fs.disk_info().free_block_count(), 1);

    assert_eq!(
        fs.file_copy("a", "c"),
        Err(BlockFSError::NotEnoughFreeBlocks)
    );
    assert!(!fs.exists_file("c").unwrap());

    assert_eq!(
        fs.file_copy("a", "b"),
        Err(BlockFSError::NotEnoughFreeBlocks)
    );
    assert_eq!(fs.read("b").unwrap(), b"keep".to_vec());
    assert_eq!(fs.disk_info().free_block_count(), 1);
    allocated_blocks_match_reachable(&fs);

    // The blocks b already owns count towards the copy.
    fs.delete_file("d").unwrap();
    assert_eq!(fs.file_copy("a", "b").unwrap(), 3000);
    assert_eq!(fs.read("b").unwrap(), content);
    assert_eq!(fs.disk_info().free_block_count(), 0);
    allocated_blocks_match_reachable(&fs);
}

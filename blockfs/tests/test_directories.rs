mod common;
extern crate blockfs;

use blockfs::{BlockFSError, FileSystem, Geometry, MAX_FILES};
use common::{allocated_blocks_match_reachable, Handler};

#[test]
fn test_nested_directories() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_directory("a").unwrap();
    fs.create_directory("a/b").unwrap();

    assert_eq!(fs.list("a").unwrap(), vec![String::from("a/b/")]);
    assert!(fs.exists_directory("a/b").unwrap());
    assert!(!fs.exists_file("a/b").unwrap());
    assert!(fs.exists_directory("/a/b/").unwrap());
    assert_eq!(fs.list("").unwrap(), vec![String::from("/a/")]);

    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_missing_parent_changes_nothing() {
    let mut handler = Handler::new(0);
    let before;
    {
        let mut fs =
            FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

        assert_eq!(
            fs.create_directory("missing/x"),
            Err(BlockFSError::ParentNotFound(String::from("missing/x")))
        );
        assert!(!fs.exists_directory("missing/x").unwrap());
        assert!(!fs.exists_directory("missing").unwrap());
    }
    before = handler.dump_disk();

    {
        let mut fs = FileSystem::open(&mut handler, Geometry::new(1024, 8)).unwrap();
        fs.create_file("f").unwrap();

        assert_eq!(
            fs.create_directory("f/x"),
            Err(BlockFSError::ParentNotFound(String::from("f/x")))
        );
        fs.delete_file("f").unwrap();
    }

    assert_eq!(handler.dump_disk(), before);
}

#[test]
fn test_create_directory_errors() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_directory("a").unwrap();

    assert_eq!(
        fs.create_directory("a"),
        Err(BlockFSError::EntryExists(String::from("a")))
    );
    assert_eq!(
        fs.create_directory(""),
        Err(BlockFSError::InvalidName(String::from("")))
    );
    assert_eq!(
        fs.create_directory("a b"),
        Err(BlockFSError::InvalidName(String::from("a b")))
    );
    assert_eq!(
        fs.create_directory("a//b"),
        Err(BlockFSError::InvalidName(String::from("a//b")))
    );
    assert_eq!(
        fs.create_directory("a/abcdefghijklmnopqrstu"),
        Err(BlockFSError::NameTooLong(String::from("abcdefghijklmnopqrstu")))
    );

    assert_eq!(fs.list("a").unwrap(), vec![String::from("0 entries")]);
    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_full_directory() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 32)).unwrap();

    for i in 0..MAX_FILES {
        fs.create_file(&format!("f{}", i)).unwrap();
    }

    let free = fs.disk_info().free_block_count();

    assert_eq!(fs.create_directory("d"), Err(BlockFSError::DirectoryFull));
    assert_eq!(fs.create_file("g"), Err(BlockFSError::DirectoryFull));
    assert_eq!(fs.disk_info().free_block_count(), free);
    assert_eq!(fs.list("").unwrap().len(), MAX_FILES);

    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_out_of_blocks() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 3)).unwrap();

    fs.create_directory("a").unwrap();

    assert_eq!(
        fs.create_directory("b"),
        Err(BlockFSError::NotEnoughFreeBlocks)
    );
    assert!(!fs.exists_directory("b").unwrap());
    assert_eq!(fs.entries("").unwrap().len(), 1);

    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_delete_directory() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_directory("a").unwrap();
    fs.create_directory("a/b").unwrap();
    fs.create_file("a/f").unwrap();

    assert_eq!(
        fs.delete_directory("a"),
        Err(BlockFSError::DirectoryNotEmpty(String::from("a")))
    );
    assert_eq!(
        fs.delete_directory("a/f"),
        Err(BlockFSError::NotADirectory(String::from("a/f")))
    );
    assert_eq!(
        fs.delete_directory("a/c"),
        Err(BlockFSError::NotFound(String::from("a/c")))
    );
    assert_eq!(
        fs.delete_directory(""),
        Err(BlockFSError::InvalidName(String::from("")))
    );

    fs.delete_directory("a/b").unwrap();
    fs.delete_file("a/f").unwrap();
    fs.delete_directory("a").unwrap();

    assert_eq!(fs.list("").unwrap(), vec![String::from("0 entries")]);
    assert_eq!(fs.disk_info().free_block_count(), 6);
    allocated_blocks_match_reachable(&fs);
}

#[test]
fn test_entries() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_directory("a").unwrap();
    fs.create_file("a/f.txt").unwrap();
    fs.append("a/f.txt", b"hello").unwrap();
    fs.create_directory("a/sub").unwrap();

    let entries = fs.entries("a").unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "f.txt");
    assert!(entries[0].is_file);
    assert_eq!(entries[0].size, 5);
    assert_eq!(entries[1].name, "sub");
    assert!(!entries[1].is_file);

    assert_eq!(
        fs.entries("a/f.txt"),
        Err(BlockFSError::NotADirectory(String::from("a/f.txt")))
    );
    assert_eq!(
        fs.entries("b"),
        Err(BlockFSError::NotFound(String::from("b")))
    );
}

#[test]
fn test_list_file_and_missing() {
    let mut handler = Handler::new(0);
    let mut fs = FileSystem::make_new_filesystem(&mut handler, Geometry::new(1024, 8)).unwrap();

    fs.create_directory("a").unwrap();
    fs.create_file("a/f.txt").unwrap();
    fs.append("a/f.txt", b"abc").unwrap();

    let lines = fs.list("a/f.txt").unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("a/f.txt "));
    assert!(lines[0].ends_with("3"));

    assert_eq!(
        fs.list("a/g"),
        Err(BlockFSError::NotFound(String::from("a/g")))
    );
}

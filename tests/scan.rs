use busyrs::scan::{self, PackageList, Position, ScanError};
use busyrs::signature::ListKind;
use std::fs;
use std::path::Path;

fn write(dir: &Path, name: &str, src: &str) {
    fs::write(dir.join(name), src).unwrap();
}

#[test]
fn extracts_exported_join_only() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "lib.rs",
        r#"
        pub fn join(elem: impl IntoIterator<Item = String>) -> String {
            elem.into_iter().collect()
        }

        fn helper() -> i32 {
            1
        }
        "#,
    );

    let scans = scan::scan(&[dir.path()]).unwrap();
    assert_eq!(scans.len(), 1);
    let funcs = &scans[0].functions;
    assert_eq!(funcs.len(), 1);

    let join = &funcs[0].signature;
    assert_eq!(join.name, "join");
    assert_eq!(join.args.len(), 1);
    assert_eq!(join.args[0].list, ListKind::Variadic);
    assert_eq!(join.args[0].type_name, "String");
    assert_eq!(join.rets.len(), 1);
    assert_eq!(join.rets[0].list, ListKind::Scalar);
    assert_eq!(join.rets[0].type_name, "String");
}

#[test]
fn struct_parameter_is_omitted_without_aborting() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "lib.rs",
        r#"
        pub struct Options { pub verbose: bool }
        pub fn run(opts: Options<'static, u8>, name: String) -> bool { true }
        pub fn after() {}
        "#,
    );
    let scans = scan::scan(&[dir.path()]).unwrap();
    let funcs = &scans[0].functions;
    assert_eq!(funcs.len(), 2);
    assert_eq!(funcs[0].signature.args.len(), 1);
    assert_eq!(funcs[0].signature.args[0].name.as_deref(), Some("name"));
    assert_eq!(funcs[0].omitted.len(), 1);
    assert_eq!(funcs[0].omitted[0].position, Position::Arg);
    assert_eq!(funcs[1].signature.name, "after");
}

#[test]
fn files_merge_in_name_order_and_tests_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "b.rs", "pub fn second() {}");
    write(dir.path(), "a.rs", "pub fn first() {}");
    write(dir.path(), "a_tests.rs", "pub fn from_tests() {}");
    write(dir.path(), "tests.rs", "pub fn also_tests() {}");
    write(dir.path(), "notes.txt", "pub fn not_rust() {}");
    fs::create_dir(dir.path().join("sub")).unwrap();
    write(&dir.path().join("sub"), "deep.rs", "pub fn deep() {}");

    let scans = scan::scan(&[dir.path()]).unwrap();
    let names: Vec<_> = scans[0]
        .functions
        .iter()
        .map(|f| (f.file.as_str(), f.signature.name.as_str()))
        .collect();
    assert_eq!(names, vec![("a.rs", "first"), ("b.rs", "second")]);
}

#[test]
fn directories_are_checked_before_parsing() {
    let good = tempfile::tempdir().unwrap();
    write(good.path(), "broken.rs", "pub fn (");
    let missing = good.path().join("missing");

    let err = scan::scan(&[good.path(), missing.as_path()]).unwrap_err();
    match err {
        ScanError::NotADirectory(path) => assert_eq!(path, missing),
        other => panic!("expected NotADirectory, got {other}"),
    }
}

#[test]
fn file_is_not_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lib.rs", "");
    let err = scan::scan(&[dir.path().join("lib.rs")]).unwrap_err();
    assert!(err.to_string().starts_with("invalid package source directory"));
}

#[test]
fn parse_failure_names_directory() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "broken.rs", "pub fn (");
    let err = scan::scan(&[dir.path()]).unwrap_err();
    assert!(matches!(err, ScanError::Parse { .. }));
    let msg = err.to_string();
    assert!(msg.contains(&dir.path().display().to_string()));
    assert!(msg.contains("broken.rs"));
}

#[test]
fn packages_scan_in_list_order() {
    let root = tempfile::tempdir().unwrap();
    for (pkg, func) in [("zeta", "z"), ("alpha/src", "a")] {
        let dir = root.path().join(pkg);
        fs::create_dir_all(&dir).unwrap();
        write(&dir, "lib.rs", &format!("pub fn {func}() -> Vec<u8> {{ Vec::new() }}"));
    }
    let packages = PackageList::from_values(["zeta", "alpha/src"]).unwrap();
    let scans = scan::scan_packages(root.path(), &packages).unwrap();

    let labels: Vec<_> = scans.iter().map(|s| s.package.as_str()).collect();
    assert_eq!(labels, vec!["zeta", "alpha/src"]);
    assert_eq!(scans[0].functions[0].signature.name, "z");
    assert_eq!(scans[1].functions[0].signature.rets[0].list, ListKind::Array);
}

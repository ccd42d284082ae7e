use std::process::{Command, Output};

use pretty_assertions::assert_eq;

fn call_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_combtune"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout_of(args: &[&str]) -> String {
    let output = call_cli(args);
    assert!(output.status.success(), "{:?}", output);
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn export_hexany_as_scl() {
    assert_eq!(
        stdout_of(&["cps", "hexany", "1", "3", "5", "7", "--scl"]),
        "2)4 hexany A=1 B=3 C=5 D=7\n\
         7\n\
         35/32\n\
         5/4\n\
         21/16\n\
         3/2\n\
         7/4\n\
         15/8\n\
         2/1\n"
    );
}

#[test]
fn print_hexany_table() {
    assert_eq!(
        stdout_of(&["cps", "4:2", "1", "3", "5", "7"]),
        "2)4 hexany A=1 B=3 C=5 D=7\n\
        \x20 0 |      35/32 |   155.140c\n\
        \x20 1 |        5/4 |   386.314c\n\
        \x20 2 |      21/16 |   470.781c\n\
        \x20 3 |        3/2 |   701.955c\n\
        \x20 4 |        7/4 |   968.826c\n\
        \x20 5 |       15/8 |  1088.269c\n"
    );
}

#[test]
fn print_mos_of_six_fifths() {
    assert_eq!(
        stdout_of(&["mos", "3/2", "--level", "6"]),
        "brun generator=0.584963 period=2.0000 level=6 murchana=0\n\
        \x20 0 |     0.0000 |     0.000c | L\n\
        \x20 1 |     0.1699 |   203.910c | L\n\
        \x20 2 |     0.3399 |   407.820c | L\n\
        \x20 3 |     0.5098 |   611.730c | s\n\
        \x20 4 |     0.5850 |   701.955c | L\n\
        \x20 5 |     0.7549 |   905.865c | L\n\
        \x20 6 |     0.9248 |  1109.775c | s\n\
         pattern LLLsLLs\n"
    );
}

#[test]
fn print_triadic_diamond_with_neighbors() {
    assert_eq!(
        stdout_of(&["diamond", "1", "3", "5", "--index", "0"]),
        "triadic diamond (0)\n\
        \x20 0 |          1 |     0.000c\n\
        \x20 1 |        6/5 |   315.641c\n\
        \x20 2 |        5/4 |   386.314c\n\
        \x20 3 |        4/3 |   498.045c\n\
        \x20 4 |        3/2 |   701.955c\n\
        \x20 5 |        8/5 |   813.686c\n\
        \x20 6 |        5/3 |   884.359c\n\
        \x20left -> harmonic triad 1 (1)\n\
         right -> triadic diamond (0)\n\
        \x20down -> triadic diamond (0)\n\
        \x20\x20\x20up -> triadic diamond (0)\n"
    );
}

#[test]
fn walk_moves_through_the_subset_ring() {
    let stdout = stdout_of(&["diamond", "--index", "7", "--walk", "ld"]);
    // left enters harmonic tetrad 1, down swaps to its subharmonic partner.
    assert!(stdout.starts_with("subharmonic tetrad 1 (9)\n"), "{}", stdout);
}

#[test]
fn missing_seeds_are_reported() {
    let output = call_cli(&["cps", "4:2", "1", "3"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("NotEnoughSeeds"), "{}", stderr);
}

//! Argument parsing of the miya binary

use clap::{CommandFactory, Parser};
use mcli::cmd::{App, Command};

const MINT: &str = "So11111111111111111111111111111111111111112";

#[test]
fn test_command_tree() {
    App::command().debug_assert();
}

#[test]
fn test_bridge_commands() {
    for args in [
        vec!["bridge", "init"],
        vec!["bridge", "add-chain", "-i", "2", "-n", "ethereum", "-a", MINT],
        vec!["bridge", "chain-status", "-i", "2", "--inactive"],
        vec![
            "bridge", "register-pair", "-s", "2", "-t", "1", "-m", MINT, "--token", "0xaa", "-f",
            "30",
        ],
        vec!["bridge", "lock", "-s", "2", "-t", "1", "-m", MINT, "-a", "5", "-r", "bb"],
        vec!["bridge", "pair", "-s", "2", "-t", "1", "-m", MINT],
    ] {
        let app = App::try_parse_from(std::iter::once("miya").chain(args.clone()));
        assert!(app.is_ok(), "{args:?}");
    }

    assert!(App::try_parse_from(["miya", "bridge", "chain", "-i", "65536"]).is_err());
}

#[test]
fn test_mixer_commands() {
    let app = App::try_parse_from([
        "miya", "--cache", "/tmp/miya", "mixer", "withdraw", "-m", MINT, "-a", "1000", "-n",
        "note", "-p", "dead", "--relayer", MINT, "--fee", "10",
    ])
    .unwrap();
    assert_eq!(app.cache.to_str(), Some("/tmp/miya"));
    assert!(matches!(app.command, Command::Mixer(_)));

    assert!(App::try_parse_from(["miya", "mixer", "notes"]).is_ok());

    let signature = "1".repeat(64);
    let note = "1".repeat(32);
    let confirm = |signature: &str| {
        App::try_parse_from(["miya", "mixer", "confirm", "-n", note.as_str(), "-s", signature])
    };
    assert!(confirm(&signature).is_ok());
    assert!(confirm("bad").is_err());
    assert!(App::try_parse_from(["miya", "mixer", "deposit", "-m", MINT, "-a", "0x10"]).is_err());
}

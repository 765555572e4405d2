//! Integration tests for tw-cli commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const STORY: &str = r#"{
    "$schema": "./schema.json",
    "nodes": [
        {"id": "welcome", "text": "The lighthouse keeper squints at you. Who are you?", "choices": [
            {"id": 1, "text": "", "nextNodeId": "landing"}
        ]},
        {"id": "landing", "text": "A spiral stair winds upward.",
         "altTextIfVisited": "The stair again.", "choices": [
            {"id": 1, "text": "Take the oil can", "nextNodeId": "landing",
             "conditions": [{"type": "hasNotItem", "item": "oil"}],
             "effects": [{"type": "addItem", "item": "oil"}]},
            {"id": 2, "text": "Climb to the lamp", "nextNodeId": "lamp",
             "conditions": [{"type": "hasItem", "item": "oil"}]},
            {"id": 3, "text": "Go home", "nextNodeId": "landing",
             "effects": [{"type": "close"}]}
        ]},
        {"id": "lamp", "text": "The lamp flares to life.", "sfx": "win", "vfx": "shake"}
    ]
}"#;

/// Create a temp directory holding `story.json`.
fn story_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("story.json");
    fs::write(&path, STORY).unwrap();
    (dir, path)
}

fn tw() -> Command {
    Command::cargo_bin("tw").unwrap()
}

fn play_plain(story: &Path, input: &str) -> assert_cmd::assert::Assert {
    tw().args(["play", "--plain"])
        .arg(story)
        .write_stdin(input)
        .assert()
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

#[test]
fn check_valid_story() {
    let (_dir, story) = story_dir();
    tw().arg("check")
        .arg(&story)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("All checks passed")
                .and(predicate::str::contains("Nodes"))
                .and(predicate::str::contains("welcome")),
        );
}

#[test]
fn check_reports_dangling_reference() {
    let dir = TempDir::new().unwrap();
    let story = dir.path().join("broken.json");
    fs::write(
        &story,
        r#"{"nodes": [{"id": "a", "text": "", "choices": [
            {"id": 1, "text": "x", "nextNodeId": "nowhere"}
        ]}]}"#,
    )
    .unwrap();

    tw().arg("check")
        .arg(&story)
        .assert()
        .failure()
        .code(1)
        .stderr(
            predicate::str::contains("references unknown node \"nowhere\"")
                .and(predicate::str::contains("error:")),
        );
}

#[test]
fn check_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let story = dir.path().join("bad.json");
    fs::write(&story, "{ not json").unwrap();

    tw().arg("check")
        .arg(&story)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load"));
}

#[test]
fn check_missing_file() {
    tw().args(["check", "/nonexistent/story.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// play --plain
// ---------------------------------------------------------------------------

#[test]
fn plain_play_walks_the_story() {
    let (dir, story) = story_dir();
    play_plain(&story, "Mara\n1\n1\n").success().stdout(
        predicate::str::contains("Who are you?")
            .and(predicate::str::contains("> Mara"))
            .and(predicate::str::contains("1. Take the oil can"))
            .and(predicate::str::contains("The stair again."))
            .and(predicate::str::contains("The lamp flares to life."))
            .and(predicate::str::contains("1. Leave")),
    );

    assert!(dir.path().join("story.save.json").exists());
}

#[test]
fn plain_play_ignores_nonsense() {
    let (_dir, story) = story_dir();
    play_plain(&story, "Mara\n7\nfoo\n\n").success().stdout(
        predicate::str::contains("> 7")
            .not()
            .and(predicate::str::contains("> foo").not()),
    );
}

#[test]
fn plain_play_resumes_saved_progress() {
    let (_dir, story) = story_dir();
    play_plain(&story, "Mara\n1\n").success();

    // Picking up the oil hid choice 1, so "1" now climbs to the lamp.
    play_plain(&story, "1\n")
        .success()
        .stdout(predicate::str::contains("The lamp flares to life."));
}

#[test]
fn plain_play_fresh_starts_over() {
    let (_dir, story) = story_dir();
    play_plain(&story, "Mara\n1\n").success();

    tw().args(["play", "--plain", "--fresh"])
        .arg(&story)
        .write_stdin("Ines\n")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("> Ines").and(predicate::str::contains("Take the oil can")),
        );
}

#[test]
fn plain_play_close_effect_ends_session() {
    let (_dir, story) = story_dir();
    play_plain(&story, "Mara\n2\n1\n").success().stdout(
        predicate::str::contains("> Go home")
            .and(predicate::str::contains("> Take the oil can").not()),
    );
}

#[test]
fn custom_save_path() {
    let (dir, story) = story_dir();
    let save = dir.path().join("slot-2.json");
    tw().args(["play", "--plain", "--save"])
        .arg(&save)
        .arg(&story)
        .write_stdin("Mara\n")
        .assert()
        .success();

    assert!(save.exists());
    assert!(!dir.path().join("story.save.json").exists());
}

// ---------------------------------------------------------------------------
// status / reset
// ---------------------------------------------------------------------------

#[test]
fn status_without_save() {
    let (_dir, story) = story_dir();
    tw().arg("status")
        .arg(&story)
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved progress"));
}

#[test]
fn status_after_play() {
    let (_dir, story) = story_dir();
    play_plain(&story, "Mara\n1\n").success();

    tw().arg("status")
        .arg(&story)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Mara")
                .and(predicate::str::contains("landing"))
                .and(predicate::str::contains("oil")),
        );
}

#[test]
fn status_does_not_write_save_file() {
    let (dir, story) = story_dir();
    tw().arg("status").arg(&story).assert().success();
    assert!(!dir.path().join("story.save.json").exists());
}

#[test]
fn reset_clears_progress() {
    let (_dir, story) = story_dir();
    play_plain(&story, "Mara\n1\n").success();

    tw().arg("reset")
        .arg(&story)
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared saved progress"));

    tw().arg("status")
        .arg(&story)
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved progress"));
}

#[test]
fn reset_keeps_settings() {
    let (dir, story) = story_dir();
    tw().args(["play", "--plain", "--speed", "5"])
        .arg(&story)
        .write_stdin("Mara\n")
        .assert()
        .success();

    tw().arg("reset").arg(&story).assert().success();

    let save = fs::read_to_string(dir.path().join("story.save.json")).unwrap();
    assert!(save.contains("\"typewriterSpeedMs\": 5"));
    assert!(!save.contains("visitedNodes"));
}

#[test]
fn reset_without_save() {
    let (_dir, story) = story_dir();
    tw().arg("reset")
        .arg(&story)
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved progress"));
}

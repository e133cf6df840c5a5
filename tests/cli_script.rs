use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};
use std::path::Path;

fn script(home: &Path, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("pooltix").unwrap();
    cmd.env("POOLTIX_CLI_SCRIPT", "1")
        .env("POOLTIX_HOME", home)
        .env("NO_COLOR", "1")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn issue_then_report_shows_grouped_totals() {
    let home = tempfile::tempdir().unwrap();
    script(
        home.path(),
        "issue adult 2\nissue child\nreport\nexit\n",
    )
    .success()
    .stdout(
        contains("Issued 2 adult ticket(s), total 440,000 Toman.")
            .and(contains("Daily report"))
            .and(contains("440,000 Toman"))
            .and(contains("190,000 Toman"))
            .and(contains("630,000 Toman")),
    );
}

#[test]
fn report_json_lists_only_issued_types() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "issue buffet_card 3 120,000\nreport --json\n")
        .success()
        .stdout(
            contains("\"type_id\": \"buffet_card\"")
                .and(contains("\"amount\": 360000"))
                .and(contains("\"adult\"").not()),
        );
}

#[test]
fn tickets_survive_between_runs() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "issue private\n").success();

    script(home.path(), "stats\nrecent\n")
        .success()
        .stdout(contains("All tickets     : 1").and(contains("4,700,000 Toman")));
    assert!(home.path().join("data").join("tickets.json").exists());
}

#[test]
fn reset_today_and_clear_report_what_they_removed() {
    let home = tempfile::tempdir().unwrap();
    script(
        home.path(),
        "issue adult 3\nreset-today\nreset-today\nissue child 2\nclear\nclear\nbackups\n",
    )
    .success()
    .stdout(
        contains("3 ticket(s) removed.")
            .and(contains("No tickets issued today."))
            .and(contains("All 2 ticket(s) deleted."))
            .and(contains("Nothing to delete."))
            .and(contains("tickets_")),
    );

    script(home.path(), "stats\n")
        .success()
        .stdout(contains("All tickets     : 0"));
}

#[test]
fn invalid_issues_are_rejected_without_writing() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "issue cash\nissue vip\nissue adult many\nstats\n")
        .success()
        .stdout(
            contains("enter an amount")
                .and(contains("Unknown ticket type `vip`."))
                .and(contains("`many` is not a valid quantity"))
                .and(contains("All tickets     : 0")),
        );
    assert!(!home.path().join("data").join("tickets.json").exists());
}

#[test]
fn mistyped_commands_get_a_suggestion() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "isue adult\n")
        .success()
        .stdout(contains("Unknown command `isue`").and(contains("Did you mean `issue`?")));
}

#[test]
fn config_set_is_saved_to_the_home_directory() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "config set recent_limit 3\nconfig show\n")
        .success()
        .stdout(contains("recent_limit set to 3."));

    let saved = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(saved.contains("\"recent_limit\": 3"));
}

#[test]
fn help_and_version_run_in_script_mode() {
    let home = tempfile::tempdir().unwrap();
    script(home.path(), "help\nhelp issue\nversion\n")
        .success()
        .stdout(
            contains("Available commands")
                .and(contains("issue <type> [quantity] [amount]"))
                .and(contains("Pooltix 0.1.0"))
                .and(contains("persian+210")),
        );
}

#[test]
fn issued_tickets_print_their_numeric_ids() {
    let home = tempfile::tempdir().unwrap();
    let output = script(home.path(), "issue adult 2\n").success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();

    let id_line = regex::Regex::new(r"(?m)^  #\d{13}  \d{4}/\d{2}/\d{2} \d{2}:\d{2}$").unwrap();
    assert_eq!(id_line.find_iter(&stdout).count(), 2);
}

mod support;

use predicates::str::contains;
use serde_json::Value;
use support::Household;

fn names(list: &Value) -> Vec<String> {
    list["entries"]
        .as_array()
        .expect("entries")
        .iter()
        .map(|entry| entry["name"].as_str().expect("name").to_string())
        .collect()
}

#[test]
fn members_are_listed_in_german_order() {
    let house = Household::new();
    for name in ["ben", "Änna", "anna", "Anja"] {
        house.add_member(name);
    }

    let list = house.json(&["member", "ls"]);
    assert_eq!(list["total"], 4);
    assert_eq!(names(&list), vec!["Anja", "Änna", "anna", "ben"]);
}

#[test]
fn member_add_trims_and_rejects_blank_names() {
    let house = Household::new();
    let data = house.json(&["member", "add", "  Anna  "]);
    assert_eq!(data["name"], "Anna");

    house
        .cmd()
        .args(["member", "add", "   "])
        .assert()
        .code(2)
        .stderr(contains("Member name cannot be empty."));
}

#[test]
fn task_add_records_participants() {
    let house = Household::new();
    let anna = house.add_member("Anna");
    house.add_member("Ben");

    let task = house.json(&[
        "task", "add", "Trash", "--date", "2024-01-10", "--notes", "blue bin", "--with", "Anna",
    ]);
    assert_eq!(task["title"], "Trash");
    assert_eq!(task["date"], "2024-01-10");
    assert_eq!(task["notes"], "blue bin");
    assert_eq!(task["participants"], serde_json::json!([anna]));

    let state = house.read_state();
    assert_eq!(state["tasks"].as_array().expect("tasks").len(), 1);
}

#[test]
fn task_add_without_members_is_rejected() {
    let house = Household::new();
    house
        .cmd()
        .args(["task", "add", "Trash"])
        .assert()
        .code(2)
        .stderr(contains("Create members first."));

    assert!(!house.state_path().exists());
}

#[test]
fn task_add_requires_title() {
    let house = Household::new();
    house.add_member("Anna");

    house
        .cmd()
        .args(["task", "add", "  ", "--date", "2024-01-10"])
        .assert()
        .code(2)
        .stderr(contains("Title and date are required."));

    assert_eq!(house.read_state()["tasks"], serde_json::json!([]));
}

#[test]
fn task_add_rejects_bad_dates_and_unknown_members() {
    let house = Household::new();
    house.add_member("Anna");

    house
        .cmd()
        .args(["task", "add", "Trash", "--date", "10.01.2024"])
        .assert()
        .code(2)
        .stderr(contains("Invalid date"));

    house
        .cmd()
        .args(["task", "add", "Trash", "--with", "Zoe"])
        .assert()
        .code(2)
        .stderr(contains("Member not found: Zoe"));
}

#[test]
fn task_add_defaults_date_to_today() {
    let house = Household::new();
    house.add_member("Anna");

    let task = house.json(&["task", "add", "Dishes"]);
    let date = task["date"].as_str().expect("date");
    assert_eq!(date.len(), 10);
    assert_eq!(task["participants"], serde_json::json!([]));
}

#[test]
fn tasks_are_listed_newest_first() {
    let house = Household::new();
    house.add_member("Anna");
    house.json(&["task", "add", "Old", "--date", "2024-01-01"]);
    house.json(&["task", "add", "New", "--date", "2024-03-05"]);
    house.json(&["task", "add", "Middle", "--date", "2024-02-01"]);

    let list = house.json(&["task", "ls"]);
    assert_eq!(list["kind"], "tasks");
    let tasks = list["tasks"].as_array().expect("tasks");
    let titles: Vec<_> = tasks.iter().map(|task| task["title"].as_str().expect("title")).collect();
    assert_eq!(titles, vec!["New", "Middle", "Old"]);
    assert_eq!(tasks[0]["date_label"], "05. März 2024");
}

#[test]
fn removing_a_member_keeps_task_history() {
    let house = Household::new();
    house.add_member("Anna");
    house.add_member("Ben");
    house.json(&["task", "add", "Trash", "--date", "2024-01-10", "--with", "Anna"]);

    let report = house.json(&["--yes", "member", "rm", "Anna"]);
    assert_eq!(report["removed"], true);
    assert_eq!(report["tasks_touched"], 1);

    let state = house.read_state();
    assert_eq!(state["members"].as_array().expect("members").len(), 1);
    assert_eq!(state["tasks"][0]["title"], "Trash");
    assert_eq!(state["tasks"][0]["participants"], serde_json::json!([]));

    house
        .cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(contains("Participants: Nobody assigned yet"));
}

#[test]
fn declined_removal_exits_cleanly() {
    let house = Household::new();
    house.add_member("Anna");

    // stdin is not a terminal, so the question is declined
    let report = house.json(&["member", "rm", "Anna"]);
    assert_eq!(report["removed"], false);
    assert_eq!(house.read_state()["members"].as_array().expect("members").len(), 1);
}

#[test]
fn assume_yes_from_config() {
    let house = Household::new();
    house.write_config("[prompt]\nassume_yes = true\n");
    house.add_member("Anna");
    house.json(&["task", "add", "Trash", "--date", "2024-01-10"]);

    let report = house.json(&["task", "rm", "Trash"]);
    assert_eq!(report["removed"], true);
    assert_eq!(house.read_state()["tasks"], serde_json::json!([]));
}

#[test]
fn task_assign_replaces_and_clears() {
    let house = Household::new();
    let anna = house.add_member("Anna");
    let ben = house.add_member("Ben");
    house.json(&["task", "add", "Trash", "--date", "2024-01-10", "--with", "Anna"]);

    let summary = house.json(&["task", "assign", "Trash", "--with", "Ben", "--with", &anna]);
    assert_eq!(
        summary["participants"],
        serde_json::json!({ "kind": "names", "names": ["Anna", "Ben"] })
    );
    assert_eq!(
        house.read_state()["tasks"][0]["participants"],
        serde_json::json!([anna, ben])
    );

    let summary = house.json(&["task", "assign", "Trash"]);
    assert_eq!(summary["participants"], serde_json::json!({ "kind": "nobody" }));
}

#[test]
fn show_filters_the_picker() {
    let house = Household::new();
    for name in ["Anna", "Ben", "Anja"] {
        house.add_member(name);
    }

    house
        .cmd()
        .args(["show", "--search", "an"])
        .assert()
        .success()
        .stdout(contains("Showing 2 of 3"))
        .stdout(contains("[ ] Anja\n  [ ] Anna"));

    let projections = house.json(&["show", "--search", "zz"]);
    assert_eq!(projections["picker"]["options"]["kind"], "no_matches");
    assert_eq!(projections["picker"]["controls"]["caption"], "Showing 0 of 3");
}

#[test]
fn empty_household_shows_markers() {
    let house = Household::new();
    house
        .cmd()
        .arg("show")
        .assert()
        .success()
        .stdout(contains("No members yet - add names first."))
        .stdout(contains("No entries yet. Record the first task!"));
}

#[test]
fn corrupt_state_loads_as_empty() {
    let house = Household::new();
    house.write_state("{ not json");

    let list = house.json(&["member", "ls"]);
    assert_eq!(list["total"], 0);

    house.add_member("Anna");
    assert_eq!(house.read_state()["members"][0]["name"], "Anna");
}

#[test]
fn json_errors_use_the_envelope() {
    let house = Household::new();
    let output = house
        .cmd()
        .args(["--json", "task", "rm", "nothing-here"])
        .output()
        .expect("run hausplan");
    assert_eq!(output.status.code(), Some(2));

    let envelope: Value = serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(envelope["status"], "error");
    assert_eq!(envelope["command"], "task rm");
    assert_eq!(envelope["error"]["kind"], "user_error");
    assert_eq!(envelope["error"]["code"], 2);
    assert_eq!(envelope["error"]["details"]["task"], "nothing-here");
    assert_eq!(envelope["next_steps"][0], "hausplan task ls");
}

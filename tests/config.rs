mod support;

use predicates::str::contains;
use support::Household;

#[test]
fn storage_key_selects_the_file() {
    let house = Household::new();
    house.write_config("[storage]\nkey = \"flat-3b\"\n");
    house.add_member("Anna");

    assert!(house.data_dir().join("flat-3b.json").exists());
    assert!(!house.state_path().exists());
}

#[test]
fn storage_dir_from_config_is_used_without_flag() {
    let house = Household::new();
    let dir = house.data_dir().join("from-config");
    house.write_config(&format!("[storage]\ndir = {:?}\n", dir.display().to_string()));

    let mut cmd = assert_cmd::Command::cargo_bin("hausplan").expect("binary");
    cmd.env_remove("HAUSPLAN_DATA_DIR")
        .env("HAUSPLAN_CONFIG", house.config_path())
        .args(["member", "add", "Anna"])
        .assert()
        .success();

    assert!(dir.join("wohnheim-tracker.json").exists());
}

#[test]
fn invalid_explicit_config_is_a_user_error() {
    let house = Household::new();
    house.write_config("[storage]\nkey = \"../escape\"\n");

    house
        .cmd()
        .args(["member", "ls"])
        .assert()
        .code(2)
        .stderr(contains("Invalid configuration"));
}

#[test]
fn unparsable_config_is_a_user_error() {
    let house = Household::new();
    house.write_config("[storage\n");

    house
        .cmd()
        .args(["member", "ls"])
        .assert()
        .code(2)
        .stderr(contains("hint: fix the config file then retry"));
}

use assert_cmd::Command;

#[test]
fn approve_refuses_to_run_without_a_key() {
    Command::cargo_bin("approve")
        .unwrap()
        .env_remove("CLAWP_PRIVATE_KEY")
        .env("CLAWP_LOG_FORMAT", "json")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn mint_rejects_a_placeholder_key() {
    Command::cargo_bin("mint")
        .unwrap()
        .env("CLAWP_PRIVATE_KEY", "YOUR_PRIVATE_KEY_HERE")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn mint_rejects_a_zero_payment() {
    Command::cargo_bin("mint")
        .unwrap()
        .env(
            "CLAWP_PRIVATE_KEY",
            "0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318",
        )
        .env("CLAWP_MINT__PAYMENT", "0")
        .assert()
        .failure()
        .code(1);
}

#[test]
fn missing_config_file_is_an_error() {
    Command::cargo_bin("dashboard")
        .unwrap()
        .args(["--config-file", "does/not/exist.ron"])
        .assert()
        .failure();
}

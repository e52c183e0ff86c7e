use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;

/// Environment variable holding the judge API key in test configs
pub const TEST_KEY_ENV: &str = "CLAIMSCORE_TEST_JUDGE_KEY";

/// A claimscore command isolated from the user's config and environment
pub fn claimscore(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("claimscore");
    cmd.current_dir(dir)
        .env("CLAIMSCORE_CONFIG_DIR", dir.join("global-config"))
        .env_remove("CLAIMSCORE_CONFIG")
        .env_remove("RUST_LOG")
        .env_remove("CLAIMSCORE_LOG")
        .env_remove(TEST_KEY_ENV);
    cmd
}

/// One question about Verona
pub fn write_ground_truth(dir: &Path) {
    fs::write(
        dir.join("gt.json"),
        r#"[{"question": "Where is Verona?", "answer": "Verona is in Italy."}]"#,
    )
    .unwrap();
}

/// A recorded pipeline answer for the ground-truth question
pub fn write_recording(dir: &Path) {
    fs::write(
        dir.join("answers.json"),
        r#"[{"question": "Where is Verona?", "answer": "Verona is in Italy.", "contexts": ["Verona is a city in Italy."]}]"#,
    )
    .unwrap();
}

/// Local config pointing the judge at `api_base`
#[allow(dead_code)]
pub fn write_config(dir: &Path, api_base: &str) {
    let config = format!(
        "[judge]\nmodel = \"test-judge\"\napi_base = \"{}\"\napi_key_env = \"{}\"\ntimeout_secs = 10\n",
        api_base, TEST_KEY_ENV
    );
    fs::write(dir.join("claimscore.toml"), config).unwrap();
}

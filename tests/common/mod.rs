#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub work: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        let work = tmp.path().join("work");
        fs::create_dir_all(&home).expect("create isolated home");
        fs::create_dir_all(&work).expect("create working dir");

        Self {
            _tmp: tmp,
            home,
            work,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("swapqa");
        cmd.env("HOME", &self.home)
            .env_remove("RUST_LOG")
            .current_dir(&self.work);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// Default log location, relative to the working directory.
    pub fn default_log(&self) -> PathBuf {
        self.work.join("faceswap_qa_log.csv")
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work.join(name);
        fs::write(&path, contents).expect("write fixture file");
        path
    }

    pub fn write_settings(&self, contents: &str) -> PathBuf {
        let dir = self.home.join(".config/swapqa");
        fs::create_dir_all(&dir).expect("create settings dir");
        let path = dir.join("config.toml");
        fs::write(&path, contents).expect("write settings");
        path
    }
}

/// Checklist object with every check ticked, as a reviewer's state file would hold it.
pub fn all_ok_checks() -> serde_json::Map<String, Value> {
    const IDS: [&str; 26] = [
        "a_source_provided",
        "a_target_provided",
        "a_output_provided",
        "b_source_face_clear",
        "b_source_no_distortions",
        "c_target_expression_readable",
        "c_target_pose_readable",
        "c_target_mouth_readable",
        "d_output_identity_preserved",
        "d_output_features_match",
        "e_expression_match",
        "e_pose_match",
        "e_mouth_match",
        "f_no_cutout_edges",
        "f_no_warping",
        "f_no_double_features",
        "f_sharpness_consistent",
        "f_lighting_consistent",
        "g_no_gender_body_mismatch",
        "g_skin_tone_matches",
        "g_no_weird_tint",
        "g_hairline_natural",
        "g_no_hair_overlap_weirdness",
        "h_no_disfigured_limbs",
        "h_no_extra_missing_limbs",
        "h_no_background_glitch",
    ];
    IDS.iter()
        .map(|id| (id.to_string(), Value::Bool(true)))
        .collect()
}

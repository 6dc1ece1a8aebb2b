mod common;

use std::path::Path;
use std::path::PathBuf;

use envar_core::AnyEmptyResult;
use envar_core::AnyResult;

struct MergeFiles {
	baseline: PathBuf,
	draft: PathBuf,
	updated: PathBuf,
}

fn write_merge_files(dir: &Path, baseline: &str, draft: &str, updated: &str) -> AnyResult<MergeFiles> {
	Ok(MergeFiles {
		baseline: common::write_file(dir, "baseline.env", baseline)?,
		draft: common::write_file(dir, "draft.env", draft)?,
		updated: common::write_file(dir, "updated.env", updated)?,
	})
}

#[test]
fn merge_keeps_local_edits_and_adopts_remote_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let files = write_merge_files(
		tmp.path(),
		"FOO=\"old\"\nBAR=\"1\"\nGONE=\"x\"\nKEEP=\"k\"\n",
		"FOO=\"bar\"\nBAR=\"1\"\nKEEP=\"k\"\nNEW=\"n\"\n",
		"FOO=\"old2\"\nBAR=\"2\"\nKEEP=\"k\"\n",
	)?;

	let output = common::envar_cmd()
		.arg("merge")
		.arg("--baseline")
		.arg(&files.baseline)
		.arg("--draft")
		.arg(&files.draft)
		.arg("--updated")
		.arg(&files.updated)
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	similar_asserts::assert_eq!(
		String::from_utf8(output.stdout)?,
		"FOO=\"bar\"\nBAR=\"2\"\nKEEP=\"k\"\nNEW=\"n\"\n"
	);

	let stderr = String::from_utf8(output.stderr)?;
	assert!(stderr.contains("modified"), "stderr: {stderr}");
	assert!(stderr.contains("added"), "stderr: {stderr}");
	assert!(!stderr.contains("GONE"), "stderr: {stderr}");

	Ok(())
}

#[test]
fn merge_json_lists_statuses_and_tombstones() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let files = write_merge_files(
		tmp.path(),
		"FOO=\"old\"\nGONE=\"x\"\n",
		"FOO=\"old\"\n",
		"FOO=\"old\"\nGONE=\"y\"\nFRESH=\"1\"\n",
	)?;

	let output = common::envar_cmd()
		.arg("merge")
		.arg("--baseline")
		.arg(&files.baseline)
		.arg("--draft")
		.arg(&files.draft)
		.arg("--updated")
		.arg(&files.updated)
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["changed"], true);

	similar_asserts::assert_eq!(
		json["entries"],
		serde_json::json!([
			{ "name": "FOO", "value": "old", "status": "unchanged" },
			{ "name": "GONE", "value": "y", "status": "deleted" },
			{ "name": "FRESH", "value": "1", "status": "unchanged" },
		])
	);

	Ok(())
}

#[test]
fn merge_without_edits_yields_updated_baseline() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let files = write_merge_files(
		tmp.path(),
		"A=\"1\"\nB=\"2\"\n",
		"A=\"1\"\nB=\"2\"\n",
		"A=\"10\"\nC=\"3\"\n",
	)?;

	common::envar_cmd()
		.arg("merge")
		.arg("--baseline")
		.arg(&files.baseline)
		.arg("--draft")
		.arg(&files.draft)
		.arg("--updated")
		.arg(&files.updated)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("A=\"10\"\nC=\"3\"\n");

	Ok(())
}

#[test]
fn merge_refuses_invalid_draft() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let files = write_merge_files(tmp.path(), "A=\"1\"\n", "A=\"1\nB=2\n", "A=\"1\"\n")?;

	common::envar_cmd()
		.arg("merge")
		.arg("--baseline")
		.arg(&files.baseline)
		.arg("--draft")
		.arg(&files.draft)
		.arg("--updated")
		.arg(&files.updated)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("envar::invalid_file"));

	Ok(())
}

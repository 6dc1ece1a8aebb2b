mod common;

use envar_core::AnyEmptyResult;
use rstest::rstest;

#[test]
fn check_passes_on_valid_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), ".env", "FOO=\"bar\"\nBAR=2\n")?;

	common::envar_cmd()
		.arg("check")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed:"))
		.stdout(predicates::str::contains("2 variable(s), 0 warning(s)"));

	Ok(())
}

#[test]
fn check_fails_on_invalid_line() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), ".env", "FOO=1\nBADLINE\n")?;

	common::envar_cmd()
		.arg("check")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("envar::invalid_line"))
		.stderr(predicates::str::contains("KEY=\"VALUE\""))
		.stderr(predicates::str::contains("Check failed:"));

	Ok(())
}

#[test]
fn check_json_reports_every_diagnostic() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(
		tmp.path(),
		".env",
		"FOO=\"bar\"\n1BAD=\"x\"\nQ=a\"b\nBADLINE\nFOO=\"again\"\n",
	)?;

	let output = common::envar_cmd()
		.arg("check")
		.arg(&file)
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert_eq!(output.status.code(), Some(1));
	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], false);
	assert_eq!(json["variables"], 2);

	let diagnostics = json["diagnostics"]
		.as_array()
		.ok_or("diagnostics should be an array")?;
	let kinds: Vec<(u64, &str)> = diagnostics
		.iter()
		.filter_map(|d| Some((d["line"].as_u64()?, d["kind"].as_str()?)))
		.collect();
	similar_asserts::assert_eq!(
		kinds,
		vec![
			(1, "duplicate-name"),
			(2, "invalid-name"),
			(3, "invalid-value"),
			(4, "invalid-line"),
			(5, "duplicate-name"),
		]
	);

	let duplicate = &diagnostics[0];
	assert_eq!(duplicate["severity"], "warning");
	assert_eq!(duplicate["name"], "FOO");
	assert_eq!(diagnostics[1]["severity"], "error");

	Ok(())
}

#[test]
fn check_passes_with_duplicate_warnings() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), ".env", "FOO=1\nFOO=2\n")?;

	common::envar_cmd()
		.arg("check")
		.arg(&file)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("be careful, the name `FOO` is already defined"))
		.stdout(predicates::str::contains("2 warning(s)"));

	Ok(())
}

#[test]
fn check_against_baseline_reports_already_defined_names() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let baseline = common::write_file(tmp.path(), "baseline.env", "FOO=\"old\"\n")?;
	let file = common::write_file(tmp.path(), ".env", "FOO=\"new\"\nBAR=\"1\"\n")?;

	common::envar_cmd()
		.arg("check")
		.arg(&file)
		.arg("--baseline")
		.arg(&baseline)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("envar::already_defined_name"))
		.stderr(predicates::str::contains("name `FOO` is already defined"));

	Ok(())
}

#[test]
fn check_rejects_invalid_baseline() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let baseline = common::write_file(tmp.path(), "baseline.env", "NOT A LINE\n")?;
	let file = common::write_file(tmp.path(), ".env", "FOO=1\n")?;

	common::envar_cmd()
		.arg("check")
		.arg(&file)
		.arg("--baseline")
		.arg(&baseline)
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("envar::invalid_file"));

	Ok(())
}

#[rstest]
#[case::error("BADLINE\n", "::error file=")]
#[case::warning("FOO=1\nFOO=2\n", "::warning file=")]
fn check_github_format_emits_annotations(
	#[case] content: &str,
	#[case] expected: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let file = common::write_file(tmp.path(), ".env", content)?;

	let output = common::envar_cmd()
		.arg("check")
		.arg(&file)
		.arg("--format")
		.arg("github")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	let stdout = String::from_utf8(output.stdout)?;
	assert!(stdout.contains(expected), "unexpected output: {stdout}");
	assert!(stdout.contains("line=1"));

	Ok(())
}

#[test]
fn check_missing_file_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::envar_cmd()
		.arg("check")
		.arg(tmp.path().join("missing.env"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("envar::io_error"));

	Ok(())
}

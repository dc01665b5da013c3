use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const ALIGNMENT_REPORT: &str = "\
Final Alignment report
======================
Sequence pairs analysed in total:\t1000
Number of paired-end alignments with a unique best hit:\t618
Mapping efficiency:\t61.8%
";

const DEDUPLICATION_REPORT: &str = "\
Total number of alignments analysed in S1_bismark_bt2_pe.bam:\t618
Total number duplicated alignments removed:\t2746545 (44.47%)
";

const SPLITTING_REPORT: &str = "\
Final Cytosine Methylation Report
=================================
Total number of C's analysed:\t1

Total methylated C's in CpG context:\t400000
Total methylated C's in CHG context:\t200
Total methylated C's in CHH context:\t300

Total C to T conversions in CpG context:\t160000
Total C to T conversions in CHG context:\t1000
Total C to T conversions in CHH context:\t2000

C methylated in CpG context:\t71.3%
C methylated in CHG context:\t1.0%
C methylated in CHH context:\t2.0%
";

/// Writes a run directory with one fully reported sample.
fn write_run(root: &Path) {
    for dir in ["Aligned", "Deduplicated", "Methylation"] {
        fs::create_dir_all(root.join(dir)).expect("failed to create run dir");
    }
    fs::write(root.join("Deduplicated/S1_bismark_bt2_pe.deduplicated.bam"), b"")
        .expect("failed to write bam");
    fs::write(
        root.join("Aligned/S1_bismark_bt2_PE_report.txt"),
        ALIGNMENT_REPORT,
    )
    .expect("failed to write alignment report");
    fs::write(
        root.join("Deduplicated/S1_bismark_bt2_pe.deduplication_report.txt"),
        DEDUPLICATION_REPORT,
    )
    .expect("failed to write deduplication report");
    fs::write(
        root.join("Methylation/S1_bismark_bt2_pe.deduplicated_splitting_report.txt"),
        SPLITTING_REPORT,
    )
    .expect("failed to write splitting report");
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bsqc-summary"))
        .args(args)
        .output()
        .expect("failed to run bsqc-summary")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// classic
// ---------------------------------------------------------------------------

#[test]
fn classic_prints_table_to_stdout() {
    let run_dir = TempDir::new().unwrap();
    write_run(run_dir.path());

    let output = run(&["classic", "-i", run_dir.path().to_str().unwrap()]);
    assert!(
        output.status.success(),
        "classic failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("\t% Duplication\t"));
    assert_eq!(
        lines[1],
        "S1\tS1_oocyte\t2000\t1000\t618\t61.8\t44.5\t560000\t-\t71.3\t-\t1.5\t500"
    );
}

#[test]
fn classic_writes_output_file() {
    let run_dir = TempDir::new().unwrap();
    write_run(run_dir.path());
    let out_dir = TempDir::new().unwrap();
    let out_path = out_dir.path().join("summary.tsv");
    fs::write(&out_path, "old contents\nold contents\nold contents\n").unwrap();

    let output = run(&[
        "classic",
        "--input_folder",
        run_dir.path().to_str().unwrap(),
        "--output_file",
        out_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty(), "nothing should go to stdout");

    let written = fs::read_to_string(&out_path).unwrap();
    assert!(written.starts_with("ID\tSample\t"));
    assert!(written.ends_with("\t1.5\t500\n"));
    assert_eq!(written.lines().count(), 2);
}

#[test]
fn classic_requires_input_folder() {
    let output = run(&["classic"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn classic_missing_deduplicated_dir_fails_without_output() {
    let run_dir = TempDir::new().unwrap();

    let output = run(&["classic", "-i", run_dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Deduplicated"), "{stderr}");
}

// ---------------------------------------------------------------------------
// extended
// ---------------------------------------------------------------------------

#[test]
fn extended_prints_table_to_stdout() {
    let run_dir = TempDir::new().unwrap();
    write_run(run_dir.path());

    let output = run(&["extended", run_dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\t% mCHH/mCHG2\tNb. CHH/G"));
    assert_eq!(
        lines[1],
        "S1_bismark_bt2_pe\tK562\t1000\t1000\t618\t61.8\t44.5\t560000\t2.00\t71.3\t-\t1.50\t3500"
    );
}

#[test]
fn extended_without_root_exits_one() {
    let output = run(&["extended"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("usage"));
}

#[test]
fn extended_honours_config_file() {
    let run_dir = TempDir::new().unwrap();
    write_run(run_dir.path());
    let config_path = run_dir.path().join("bsqc.yml");
    fs::write(&config_path, "sample_label: \"{id}/HeLa\"\ncpg_denominator: 5600000\n").unwrap();

    let output = run(&[
        "extended",
        run_dir.path().to_str().unwrap(),
        "--config",
        config_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    let columns: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(columns[1], "S1_bismark_bt2_pe/HeLa");
    assert_eq!(columns[8], "10.00");
}

#[test]
fn extended_json_format() {
    let run_dir = TempDir::new().unwrap();
    write_run(run_dir.path());

    let output = run(&["extended", run_dir.path().to_str().unwrap(), "--format", "json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("Invalid JSON output: {e}\n{stdout}"));
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
    assert_eq!(parsed[0]["raw_sequences"], 1000);
    assert_eq!(parsed[0]["non_cpg_ratio"], "1.50");
}

#[test]
fn malformed_value_fails_run() {
    let run_dir = TempDir::new().unwrap();
    write_run(run_dir.path());
    fs::write(
        run_dir.path().join("Aligned/S1_bismark_bt2_PE_report.txt"),
        "Mapping efficiency:\tunknown\n",
    )
    .unwrap();

    let output = run(&["extended", run_dir.path().to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Mapping efficiency:"), "{stderr}");
}

// ---------------------------------------------------------------------------
// fields
// ---------------------------------------------------------------------------

#[test]
fn fields_prints_extracted_values() {
    let run_dir = TempDir::new().unwrap();
    write_run(run_dir.path());
    let report = run_dir
        .path()
        .join("Deduplicated/S1_bismark_bt2_pe.deduplication_report.txt");

    let output = run(&[
        "fields",
        "--kind",
        "deduplication",
        report.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["duplication_percent"], 44.47);
    assert_eq!(parsed.as_object().map(|o| o.len()), Some(1));
}

#[test]
fn fields_for_missing_report_is_empty() {
    let dir = TempDir::new().unwrap();
    let output = run(&[
        "fields",
        "--kind",
        "splitting",
        "--dialect",
        "classic",
        dir.path().join("absent.txt").to_str().unwrap(),
    ]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "{}");
}

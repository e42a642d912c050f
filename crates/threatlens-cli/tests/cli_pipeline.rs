//! Extraction followed by charting, driven through the CLI library

use std::fs;
use std::path::Path;
use threatlens_cli::commands::{extract_with, visualize_table};
use threatlens_cli::{Config, Formatter};
use threatlens_llm::MockClient;

const RESPONSE: &str = "\
Threat Type\tSeverity Level\tAffected Systems\tTimestamp\tDescription\tSuggested Mitigation Steps
Brute Force\tHigh\tSSH Gateway\t2024-02-01 03:12:44\tRepeated failed root logins\tDisable password auth
Port Scan\tLow\tEdge Firewall\t2024-02-02\tSequential SYN probes\tRate-limit inbound SYN";

#[test]
fn test_extract_then_visualize() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("auth.log");
    fs::write(
        &input,
        "Feb  1 03:12:44 gw sshd[811]: Failed password for root from 203.0.113.7\n\
         Feb  1 03:12:47 gw sshd[811]: Failed password for root from 203.0.113.7\n\
         Feb  2 11:02:10 fw kernel: SYN scan from 198.51.100.23\n",
    )
    .unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            "[report]\noutput_dir = {:?}\n\n[paths]\ntable = {:?}\n",
            dir.path().join("charts"),
            dir.path().join("incidents.csv")
        ),
    )
    .unwrap();
    let config = Config::load(Some(config_path.as_path())).unwrap();

    let client = MockClient::new(RESPONSE);
    let report = extract_with(
        client.clone(),
        "mock",
        &input,
        &config.paths.table,
        &config.extractor,
    )
    .unwrap();
    assert_eq!(client.call_count(), 1);
    assert_eq!(report.table.len(), 2);

    let csv = fs::read_to_string(&config.paths.table).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let charts = visualize_table(
        &config.paths.table,
        &config.report,
        &Formatter::new(false, 5),
    )
    .unwrap();
    assert!(charts.is_complete());
    for name in [
        "threat_type_distribution.svg",
        "severity_levels_distribution.svg",
        "affected_systems_count.svg",
        "threats_over_time.svg",
    ] {
        assert!(Path::new(&config.report.output_dir).join(name).exists());
    }
}

#[test]
fn test_failed_extraction_still_writes_header() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("syslog.txt");
    let output = dir.path().join("out.csv");
    fs::write(&input, "kernel: oops\n").unwrap();

    let mut client = MockClient::default();
    client.add_error("kernel");

    let report = extract_with(
        client,
        "mock",
        &input,
        &output,
        &Config::default().extractor,
    )
    .unwrap();
    assert!(report.table.is_empty());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(fs::read_to_string(&output).unwrap().lines().count(), 1);
}

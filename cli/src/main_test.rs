use super::*;

use authsync::StatusReport;

#[test]
fn parses_subcommands_and_flags() {
    let cli = Cli::try_parse_from([
        "authsync",
        "--base-url",
        "http://api.test:9000",
        "--session-cookie",
        "abc123",
        "callback",
    ])
    .unwrap();
    assert_eq!(cli.base_url.as_deref(), Some("http://api.test:9000"));
    assert_eq!(cli.session_cookie.as_deref(), Some("abc123"));
    assert_eq!(cli.command, Command::Callback);
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["authsync", "whoami"]).is_err());
}

#[test]
fn describe_covers_every_status() {
    let signed_in = SessionState::from_report(&StatusReport::signed_in("ada@example.com"), 1);
    assert_eq!(describe(&signed_in), "signed in as ada@example.com");
    assert_eq!(describe(&SessionState::signed_out(2)), "signed out");
    assert_eq!(describe(&SessionState::default()), "sign-in status unknown");
}

use super::*;

fn parse(args: &[&str]) -> CliCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    cli.command
}

#[test]
fn cli_parse_extract_defaults() {
    match parse(&["tapload", "extract", "--param", "UPLOAD=t,http://example.com/t"]) {
        CliCommand::Extract {
            syntax,
            params,
            files,
            digest,
            json,
        } => {
            assert!(syntax.is_none());
            assert_eq!(
                params,
                vec![("UPLOAD".to_string(), "t,http://example.com/t".to_string())]
            );
            assert!(files.is_empty());
            assert!(!digest);
            assert!(!json);
        }
        _ => panic!("expected Extract"),
    }
}

#[test]
fn cli_parse_extract_full() {
    match parse(&[
        "tapload",
        "extract",
        "--syntax",
        "dali",
        "--param",
        "UPLOAD=a,param:foo",
        "--param",
        "QUERY=SELECT a=1",
        "--file",
        "foo=/tmp/foo.xml",
        "--digest",
        "--json",
    ]) {
        CliCommand::Extract {
            syntax,
            params,
            files,
            digest,
            json,
        } => {
            assert_eq!(syntax, Some(UploadSyntax::Dali));
            assert_eq!(params.len(), 2);
            assert_eq!(params[1].1, "SELECT a=1");
            assert_eq!(files, vec![("foo".to_string(), "/tmp/foo.xml".to_string())]);
            assert!(digest && json);
        }
        _ => panic!("expected Extract"),
    }
}

#[test]
fn cli_parse_check() {
    match parse(&["tapload", "check", "--syntax", "TAP", "a,http://x;b,http://y"]) {
        CliCommand::Check { syntax, values } => {
            assert_eq!(syntax, Some(UploadSyntax::Tap));
            assert_eq!(values, vec!["a,http://x;b,http://y"]);
        }
        _ => panic!("expected Check"),
    }
}

#[test]
fn cli_rejects_bad_arguments() {
    assert!(Cli::try_parse_from(["tapload", "check"]).is_err());
    assert!(Cli::try_parse_from(["tapload", "check", "--syntax", "soap", "a,b:c"]).is_err());
    assert!(Cli::try_parse_from(["tapload", "extract", "--param", "novalue"]).is_err());
    assert!(Cli::try_parse_from(["tapload", "extract", "--file", "=/tmp/x"]).is_err());
}

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hl7_message::{Location, Message, SplitConfig};
use log::{debug, LevelFilter};

const EXIT_OK: i32 = 0;
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_USAGE: i32 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "hl7msg",
    version,
    about = "Read and edit HL7 v2 messages by segment, field and component",
    long_about = "hl7msg reads an HL7 v2 message from a file or stdin and reads or edits it\n\
        by position. Locations are written SEG[occurrence]-field.component, with\n\
        occurrences and fields counted from 1 and components from 0.\n\n\
        EXAMPLES:\n\
        \n  hl7msg get PID-5.1 -i adt.hl7              Print the given name\n\
        \n  hl7msg get 'AL1[2]-3' -i adt.hl7           Field 3 of the second AL1\n\
        \n  hl7msg set PID-5.1 JANE -i adt.hl7         Rewrite a component\n\
        \n  hl7msg delete AL1 1 < adt.hl7              Drop the first AL1 segment\n\
        \n  hl7msg render --lf < adt.hl7               Print one segment per line"
)]
struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Message file (reads from stdin if not provided)
    #[arg(short, long, value_name = "FILE", global = true)]
    input: Option<PathBuf>,

    /// Reject input whose first segment is not MSH
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand, Clone)]
enum Command {
    /// Print the segment, field or component at a location
    Get(GetArgs),
    /// Write a field or component and print the updated message
    Set(SetArgs),
    /// Print how many segments of a type the message holds
    Count(CountArgs),
    /// Remove one segment and print the updated message
    Delete(DeleteArgs),
    /// Print the message with normalised segment separators
    Render(OutputArgs),
    /// List segments one per line, or as JSON
    Segments(SegmentsArgs),
}

#[derive(Debug, Args, Clone)]
struct GetArgs {
    /// Location such as PID-5.1
    #[arg(value_name = "LOCATION")]
    location: String,
}

#[derive(Debug, Args, Clone)]
struct SetArgs {
    /// Field or component location such as PID-5.1
    #[arg(value_name = "LOCATION")]
    location: String,

    /// New value; an empty string blanks the position
    #[arg(value_name = "VALUE", allow_hyphen_values = true)]
    value: String,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args, Clone)]
struct CountArgs {
    /// Segment type such as OBX
    #[arg(value_name = "SEGMENT")]
    segment: String,
}

#[derive(Debug, Args, Clone)]
struct DeleteArgs {
    /// Segment type such as AL1
    #[arg(value_name = "SEGMENT")]
    segment: String,

    /// Which occurrence to remove, counted from 1
    #[arg(value_name = "OCCURRENCE", default_value_t = 1)]
    occurrence: usize,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Debug, Args, Clone, Default)]
struct OutputArgs {
    /// Separate segments with line feeds instead of carriage returns
    #[arg(long)]
    lf: bool,
}

#[derive(Debug, Args, Clone)]
struct SegmentsArgs {
    /// Print segments as a JSON array
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

fn read_source_from_input(input: &Option<PathBuf>) -> Result<String, String> {
    if let Some(path) = input {
        fs::read_to_string(path).map_err(|e| format!("failed to read '{}': {e}", path.display()))
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| format!("failed to read from stdin: {e}"))?;
        Ok(buf)
    }
}

fn load_message(source: &str, strict: bool) -> Result<Message, String> {
    let config = SplitConfig {
        require_header: strict,
        ..SplitConfig::default()
    };
    Message::parse_with(source, config).map_err(|e| e.to_string())
}

fn parse_location(text: &str) -> Result<Location, String> {
    text.parse::<Location>()
        .map_err(|e| format!("invalid location '{text}': {e}"))
}

fn write_message(msg: &Message, output: &OutputArgs, out: &mut dyn Write) -> i32 {
    let rendered = if output.lf {
        msg.segments().join("\n")
    } else {
        msg.render()
    };
    match writeln!(out, "{rendered}") {
        Ok(()) => EXIT_OK,
        Err(e) => {
            eprintln!("error: failed to write output: {e}");
            EXIT_USAGE
        }
    }
}

fn write_line(out: &mut dyn Write, line: &str) -> i32 {
    match writeln!(out, "{line}") {
        Ok(()) => EXIT_OK,
        Err(e) => {
            eprintln!("error: failed to write output: {e}");
            EXIT_USAGE
        }
    }
}

fn run_get(msg: &Message, args: &GetArgs, out: &mut dyn Write) -> i32 {
    let location = match parse_location(&args.location) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };
    match msg.get(&location) {
        Some(value) => write_line(out, value),
        None => {
            debug!("nothing at {location}");
            EXIT_NOT_FOUND
        }
    }
}

fn run_set(mut msg: Message, args: &SetArgs, out: &mut dyn Write) -> i32 {
    let location = match parse_location(&args.location) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };
    if !msg.set(&location, &args.value) {
        eprintln!("error: cannot write at '{location}'; give a field or component within range");
        return EXIT_USAGE;
    }
    write_message(&msg, &args.output, out)
}

fn run_count(msg: &Message, args: &CountArgs, out: &mut dyn Write) -> i32 {
    write_line(out, &msg.segment_count(&args.segment).to_string())
}

fn run_delete(mut msg: Message, args: &DeleteArgs, out: &mut dyn Write) -> i32 {
    if !msg.delete_segment(&args.segment, args.occurrence) {
        eprintln!(
            "error: no {} segment with occurrence {}",
            args.segment, args.occurrence
        );
        return EXIT_NOT_FOUND;
    }
    write_message(&msg, &args.output, out)
}

fn run_segments(msg: &Message, args: &SegmentsArgs, out: &mut dyn Write) -> i32 {
    if args.json {
        return match serde_json::to_string_pretty(msg) {
            Ok(json) => write_line(out, &json),
            Err(e) => {
                eprintln!("error: failed to serialize message: {e}");
                EXIT_USAGE
            }
        };
    }
    for segment in msg.segments() {
        let rc = write_line(out, segment);
        if rc != EXIT_OK {
            return rc;
        }
    }
    EXIT_OK
}

fn execute(command: &Command, source: &str, strict: bool, out: &mut dyn Write) -> i32 {
    let msg = match load_message(source, strict) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };
    debug!("loaded message with {} segments", msg.len());

    match command {
        Command::Get(args) => run_get(&msg, args, out),
        Command::Set(args) => run_set(msg, args, out),
        Command::Count(args) => run_count(&msg, args, out),
        Command::Delete(args) => run_delete(msg, args, out),
        Command::Render(args) => write_message(&msg, args, out),
        Command::Segments(args) => run_segments(&msg, args, out),
    }
}

fn run_cli() -> i32 {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = match read_source_from_input(&cli.input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return EXIT_USAGE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(&cli.command, &source, cli.strict, &mut out)
}

fn main() {
    std::process::exit(run_cli());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ADT: &str = "MSH|^~\\&|APP|FAC|RAPP|RFAC|202401011200||ADT^A01|42|P|2.3\r\
                       PID|||123||DOE^JOHN\r\
                       AL1|1|FA|4223^SEAFOOD\r\
                       AL1|2|SV|7753^PENICILLIN";

    fn run(command: Command, source: &str) -> (i32, String) {
        let mut out = Vec::new();
        let rc = execute(&command, source, false, &mut out);
        (rc, String::from_utf8(out).unwrap())
    }

    #[test]
    fn get_prints_component() {
        let (rc, out) = run(
            Command::Get(GetArgs {
                location: "PID-5.1".into(),
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_OK);
        assert_eq!(out, "JOHN\n");
    }

    #[test]
    fn get_missing_is_not_found() {
        let (rc, out) = run(
            Command::Get(GetArgs {
                location: "AL1[3]-3".into(),
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_NOT_FOUND);
        assert_eq!(out, "");
    }

    #[test]
    fn get_bad_location_is_usage_error() {
        let (rc, _) = run(
            Command::Get(GetArgs {
                location: "pid-5".into(),
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_USAGE);
    }

    #[test]
    fn set_prints_updated_message() {
        let (rc, out) = run(
            Command::Set(SetArgs {
                location: "PID-5.1".into(),
                value: "JANE".into(),
                output: OutputArgs { lf: true },
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_OK);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "PID|||123||DOE^JANE");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn set_whole_segment_is_refused() {
        let (rc, out) = run(
            Command::Set(SetArgs {
                location: "PID".into(),
                value: "PID|1".into(),
                output: OutputArgs::default(),
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_USAGE);
        assert_eq!(out, "");
    }

    #[test]
    fn set_out_of_range_index_is_refused() {
        let (rc, out) = run(
            Command::Set(SetArgs {
                location: format!("PID-5.{}", usize::MAX),
                value: "X".into(),
                output: OutputArgs::default(),
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_USAGE);
        assert_eq!(out, "");
    }

    #[test]
    fn count_and_delete() {
        let (rc, out) = run(
            Command::Count(CountArgs {
                segment: "AL1".into(),
            }),
            ADT,
        );
        assert_eq!((rc, out.as_str()), (EXIT_OK, "2\n"));

        let (rc, out) = run(
            Command::Delete(DeleteArgs {
                segment: "AL1".into(),
                occurrence: 1,
                output: OutputArgs::default(),
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_OK);
        assert!(!out.contains("SEAFOOD"));
        assert!(out.contains("PENICILLIN"));

        let (rc, _) = run(
            Command::Delete(DeleteArgs {
                segment: "IN1".into(),
                occurrence: 1,
                output: OutputArgs::default(),
            }),
            ADT,
        );
        assert_eq!(rc, EXIT_NOT_FOUND);
    }

    #[test]
    fn render_normalises_line_endings() {
        let (rc, out) = run(
            Command::Render(OutputArgs::default()),
            "MSH|^~\\&|APP\r\nPID|1\n",
        );
        assert_eq!(rc, EXIT_OK);
        assert_eq!(out, "MSH|^~\\&|APP\rPID|1\n");
    }

    #[test]
    fn segments_as_json() {
        let (rc, out) = run(Command::Segments(SegmentsArgs { json: true }), "MSH|^~\\&\rPID|1");
        assert_eq!(rc, EXIT_OK);
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec!["MSH|^~\\&", "PID|1"]);
    }

    #[test]
    fn strict_mode_rejects_missing_header() {
        let mut out = Vec::new();
        let rc = execute(
            &Command::Count(CountArgs {
                segment: "PID".into(),
            }),
            "PID|1",
            true,
            &mut out,
        );
        assert_eq!(rc, EXIT_USAGE);
    }

    #[test]
    fn reads_message_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adt.hl7");
        fs::write(&path, ADT).unwrap();
        let source = read_source_from_input(&Some(path)).unwrap();
        assert_eq!(source, ADT);

        let missing = read_source_from_input(&Some(dir.path().join("missing.hl7")));
        assert!(missing.unwrap_err().contains("failed to read"));
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["hl7msg", "get", "PID-5", "-i", "adt.hl7", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.input, Some(PathBuf::from("adt.hl7")));
        assert!(matches!(cli.command, Command::Get(ref a) if a.location == "PID-5"));
    }

    #[test]
    fn cli_help_contains_expected_content() {
        use clap::CommandFactory;
        let mut cmd = Cli::command();
        let mut buf = Vec::new();
        cmd.write_long_help(&mut buf).unwrap();
        let help = String::from_utf8(buf).unwrap();

        assert!(help.contains("hl7msg"), "help should mention 'hl7msg'");
        assert!(help.contains("EXAMPLES"), "help should include examples section");
        assert!(help.contains("get"), "help should list get subcommand");
        assert!(help.contains("render"), "help should list render subcommand");
        assert!(help.contains("--version"), "help should show version flag");
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

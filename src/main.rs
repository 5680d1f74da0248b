mod app;
mod calendar;
mod help;
mod picker;
mod theme;
use crate::app::App;
use crate::calendar::{
    on_or_before_today, MarkFn, SimpleDate, WeekFactory, WeekPager, WeekStart, WeekdayLabels,
};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use time::{format_description::FormatItem, macros::format_description, Date, OffsetDateTime};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Environment variable holding an `env_logger` filter for the log file
const LOG_FILTER_VAR: &str = "WEEKSWIPE_LOG";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        week_start: WeekStart,
        date: Option<Date>,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut week_start = None;
        let mut date = None;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('s') | Arg::Long("week-start") => {
                    week_start = Some(parser.value()?.parse::<WeekStart>()?);
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if date.is_none() => {
                    let value = value.string()?;
                    match Date::parse(&value, &YMD_FMT) {
                        Ok(d) => date = Some(d),
                        Err(e) => {
                            return Err(lexopt::Error::ParsingFailed {
                                value,
                                error: Box::new(e),
                            })
                        }
                    }
                }
                _ => return Err(arg.unexpected()),
            }
        }
        let Some(week_start) = week_start else {
            return Err(lexopt::Error::from(
                "--week-start is required (0-6 with 0 = Sunday, or a weekday name)",
            ));
        };
        Ok(Command::Run {
            week_start,
            date,
            log_file,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                week_start,
                date,
                log_file,
            } => {
                if let Some(path) = log_file {
                    init_logging(&path)?;
                }
                let now = OffsetDateTime::now_local().context("failed to determine local date")?;
                let today = SimpleDate::from_datetime(now, week_start);
                log::info!(
                    "Starting on {} (day {} of a week beginning on {})",
                    today.date(),
                    today.day_of_week_index(),
                    week_start.weekday()
                );
                let marker: MarkFn = on_or_before_today;
                let factory = WeekFactory::new(week_start, WeekdayLabels::SINGLE_LETTER, marker);
                let mut pager =
                    WeekPager::new(today.date(), factory).context("failed to build today's week")?;
                if let Some(date) = date {
                    pager = pager.start_date(date);
                }
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(pager)
                        .run(&mut terminal)
                        .context("failed to run calendar")?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: weekswipe --week-start <DAY> [--log-file <PATH>] [YYYY-MM-DD]");
                println!();
                println!("Swipeable terminal week strip with a synchronized day pager");
                println!();
                println!("Options:");
                println!("  -s, --week-start <DAY>  First day of the week: 0-6 (0 = Sunday)");
                println!("                          or a weekday name");
                println!("      --log-file <PATH>   Write logs to the given file; filter with");
                println!("                          the {LOG_FILTER_VAR} environment variable");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

// Logs go to a file, as anything written to the terminal would garble the
// calendar.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env(env_logger::Env::new().filter(LOG_FILTER_VAR))
        .target(env_logger::fmt::Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to initialize logging")?;
    Ok(())
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args.iter().copied()))
    }

    #[test]
    fn test_run() {
        assert_eq!(
            parse(&["--week-start", "monday", "2022-10-26"]).ok(),
            Some(Command::Run {
                week_start: WeekStart::new(1).expect("week start should be valid"),
                date: Some(date!(2022 - 10 - 26)),
                log_file: None,
            })
        );
        assert_eq!(
            parse(&["-s", "0", "--log-file", "weekswipe.log"]).ok(),
            Some(Command::Run {
                week_start: WeekStart::new(0).expect("week start should be valid"),
                date: None,
                log_file: Some(PathBuf::from("weekswipe.log")),
            })
        );
    }

    #[test]
    fn test_week_start_required() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["2022-10-26"]).is_err());
    }

    #[test]
    fn test_bad_args() {
        assert!(parse(&["--week-start", "7"]).is_err());
        assert!(parse(&["--week-start", "1", "2022-13-01"]).is_err());
        assert!(parse(&["--week-start", "1", "2022-10-26", "2022-10-27"]).is_err());
    }

    #[test]
    fn test_help_and_version() {
        assert_eq!(parse(&["-s", "1", "--help"]).ok(), Some(Command::Help));
        assert_eq!(parse(&["-V"]).ok(), Some(Command::Version));
    }
}

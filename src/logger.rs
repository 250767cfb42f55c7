use crate::config::LogConfig;
use crate::utils::ErrorStr;

use std::fmt::Display;
use std::fs::OpenOptions;
use std::str::FromStr;

use simplelog::{ColorChoice, LevelFilter, TerminalMode, TermLogger, WriteLogger};


const LOG_CONSOLE: &str = "console";
const LOG_FILE: &str = "file";

pub const LOGGER_ERROR: ErrorStr = "logger init error";


pub fn init_logger(cfg: &LogConfig) -> Result<(), ErrorStr> {
    let level = parse_level(&cfg.level);
    match cfg.kind.as_str() {
        LOG_CONSOLE => init_term_logger(level),
        LOG_FILE    => init_file_logger(level, &cfg.file),
        _           => {
            eprintln!(
                "Unsupported log type: {}, only `file` and `console` are supported. Use `console` by default",
                cfg.kind
            );
            init_term_logger(level)
        }
    }
}

fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or_else(|_| {
        eprintln!("Unknown log level: {}, use `info` by default", level);
        LevelFilter::Info
    })
}


fn prepare_logger_config() -> simplelog::Config {
    simplelog::ConfigBuilder::new().set_time_format_custom(
        simplelog::format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
        )
    ).build()
}

fn init_term_logger(level: LevelFilter) -> Result<(), ErrorStr> {
    TermLogger::init(
        level,
        prepare_logger_config(),
        TerminalMode::Stderr, ColorChoice::Auto
    ).map_err(get_reporter("LOGGER", "Terminal", LOGGER_ERROR))
}

fn init_file_logger(level: LevelFilter, filename: &str) -> Result<(), ErrorStr> {
    let file = OpenOptions::new().create(true).append(true).open(filename)
        .map_err(|e| {
            eprintln!("Could not open log file {}: {}", filename, e);
            LOGGER_ERROR
        })?;
    WriteLogger::init(level, prepare_logger_config(), file)
        .map_err(get_reporter("LOGGER", "File", LOGGER_ERROR))
}


/// Build a `map_err` callback that logs the full error under `module` and
/// `subject` and hands back the short `err` text.
pub fn get_reporter<E: Display>(module: &'static str, subject: &'static str, err: ErrorStr) -> impl Fn(E) -> ErrorStr {
    move |e: E| {
        error!("[{}] {} error: {}", module, subject, e);
        err
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level("WARN"), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn reporter_returns_short_text() {
        let report = get_reporter::<&str>("TEST", "Thing", "thing failed");
        let res: Result<(), ErrorStr> = Err("details").map_err(&report);
        assert_eq!(res, Err("thing failed"));
    }
}

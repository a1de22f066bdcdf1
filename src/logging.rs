use std::fmt::Display;

use colored::Colorize;
use log::Level;

/// Dependencies only get to log warnings and errors
const ALLOWED_EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];
const ALLOWED_LEVELS: [Level; 3] = [Level::Info, Level::Warn, Level::Error];

pub fn init_logger(verbose: bool) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(move |out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:^5} {} {:^8} {}",
                level_badge(record.level()),
                now.format("%H:%M:%S").to_string().bright_black(),
                target,
                message
            ))
        })
        .filter(move |meta| {
            let target = Target::from_str(meta.target());
            let level = meta.level();

            let is_allowed = ALLOWED_LEVELS.contains(&level) || verbose && level == Level::Debug;
            let is_severe = ALLOWED_EXTERNAL_LEVELS.contains(&level);

            target.is_local() && is_allowed || is_severe
        })
        .chain(std::io::stdout())
        .apply()
}

enum Target {
    External(String),
    Cli,
    Core,
    Api,
    Sync,
}

impl Target {
    fn from_str(target: &str) -> Self {
        let module = target.split("::").next().unwrap_or_default();

        match module {
            "flare" => Self::Cli,
            "flare_core" => Self::Core,
            "flare_api" => Self::Api,
            "flare_sync" => Self::Sync,
            other => Self::External(other.to_string()),
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Target::External(x) => x.as_str().clear(),
            Target::Cli => "FLARE".bright_red(),
            Target::Core => "CORE".blue(),
            Target::Api => "API".bright_green(),
            Target::Sync => "SYNC".bright_purple(),
        };

        Display::fmt(&result, f)
    }
}

fn level_badge(level: Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}

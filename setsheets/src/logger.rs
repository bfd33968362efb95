use time::OffsetDateTime;
use time::macros::format_description;

pub fn setup_logger(level: log::LevelFilter) -> Result<(), log::SetLoggerError> {
    let timestamp = format_description!("[[[year]-[month]-[day]][[[hour]:[minute]:[second]]");
    fern::Dispatch::new()
        .format(move |out, message, record| {
            let now = OffsetDateTime::now_utc()
                .format(timestamp)
                .unwrap_or_default();
            out.finish(format_args!(
                "{}[{}][{}] {}",
                now,
                record.target(),
                record.level(),
                message
            ))
        })
        .level(level)
        // keep the http stack quiet unless asked for
        .level_for("hyper", log::LevelFilter::Warn)
        .level_for("reqwest", log::LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()
}

//! Reports translation keys used in templates but missing from a locale,
//! and locale keys no template uses.
//!
//! Usage: `i18n-check <templates-dir> <locales-dir>`. Exits with status 1
//! when any locale is missing keys.

use std::path::PathBuf;
use std::process::ExitCode;

use env_logger::Env;

use carwash_admin::i18n::{collect_template_keys, diff_keys, load_locale_dir};

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let mut args = std::env::args().skip(1);
    let (Some(templates), Some(locales)) = (args.next(), args.next()) else {
        eprintln!("usage: i18n-check <templates-dir> <locales-dir>");
        return ExitCode::from(2);
    };

    let used = match collect_template_keys(&PathBuf::from(&templates)) {
        Ok(keys) => keys,
        Err(err) => {
            log::error!("Failed to scan templates: {err}");
            return ExitCode::from(2);
        }
    };
    let locales = match load_locale_dir(&PathBuf::from(&locales)) {
        Ok(locales) => locales,
        Err(err) => {
            log::error!("Failed to load locales: {err}");
            return ExitCode::from(2);
        }
    };

    let mut has_missing = false;
    for (lang, messages) in &locales {
        let diff = diff_keys(&used, messages.keys());
        for key in &diff.missing {
            println!("{lang}: missing {key}");
        }
        for key in &diff.unused {
            println!("{lang}: unused {key}");
        }
        has_missing |= !diff.missing.is_empty();
    }

    println!("{} keys used in templates, {} locale(s) checked", used.len(), locales.len());

    if has_missing {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

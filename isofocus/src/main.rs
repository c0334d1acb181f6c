#![warn(clippy::pedantic)]

pub mod actions;
pub mod driver;
pub mod preferences;
pub mod session;

use anyhow::Result as AnyResult;

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Debug);
    }

    let hotkeys = preferences::Hotkeys::load();
    if hotkeys.did_fail_to_load() {
        // Write out the defaults, so there's something to edit next time.
        if let Err(e) = hotkeys.save() {
            log::warn!("Failed to save hotkey config:\n{e:?}");
        };
    }

    // Args are the names of the objects to start with. The first is active.
    let names: Vec<String> = std::env::args().skip(1).collect();
    let mut driver = if names.is_empty() {
        driver::Driver::with_objects(["Cube", "Light", "Camera"])
    } else {
        driver::Driver::with_objects(names)
    };

    if let Some(keys) = hotkeys
        .actions_to_keys
        .keys_of(actions::Action::IsolateFocusToggle)
    {
        let keys: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
        log::info!("Isolate & Focus on {}", keys.join(", "));
    }

    let mut session = session::AddonSession::new();
    session.start(driver.keymap_mut(), &hotkeys)?;

    serve(&mut driver, &mut session, std::io::stdin().lock())
}

/// Run input through the driver, then stop the session. The session is stopped even if reading failed.
fn serve(
    driver: &mut driver::Driver,
    session: &mut session::AddonSession,
    input: impl std::io::BufRead,
) -> AnyResult<()> {
    let read = run(driver, input);
    session.stop(driver.keymap_mut())?;
    read.map_err(Into::into)
}

/// Feed every line of `input` to the driver, until end of input or a read error.
fn run(driver: &mut driver::Driver, input: impl std::io::BufRead) -> std::io::Result<()> {
    for line in input.lines() {
        let line = line?;
        match driver.handle_line(&line) {
            Ok(Some(reply)) => println!("{reply}"),
            Ok(None) => (),
            // Recoverable, keep reading.
            Err(e) => log::error!("{line:?}: {e}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    /// Yields one good line, then fails.
    struct BrokenInput(Option<&'static [u8]>);
    impl std::io::Read for BrokenInput {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.0.take() {
                Some(bytes) => {
                    buf[..bytes.len()].copy_from_slice(bytes);
                    Ok(bytes.len())
                }
                None => Err(std::io::Error::other("input closed")),
            }
        }
    }

    fn started() -> (driver::Driver, session::AddonSession) {
        let mut driver = driver::Driver::with_objects(["Cube", "Light"]);
        let hotkeys =
            preferences::Hotkeys::from_keys(actions::hotkeys::ActionsToKeys::default());
        let mut session = session::AddonSession::new();
        session.start(driver.keymap_mut(), &hotkeys).unwrap();
        (driver, session)
    }

    #[test]
    fn serve_until_end() {
        let (mut driver, mut session) = started();
        serve(&mut driver, &mut session, &b"ctrl+alt+F\nbogus\n"[..]).unwrap();
        assert!(driver.queue().read_with(|scene| scene.store().is_active()));
        assert!(driver.keymap_mut().is_empty());
    }
    #[test]
    fn read_error_still_releases_bindings() {
        let (mut driver, mut session) = started();
        let input = std::io::BufReader::new(BrokenInput(Some(b"ctrl+alt+F\n")));

        assert!(serve(&mut driver, &mut session, input).is_err());
        // The line before the failure was still handled.
        assert!(driver.queue().read_with(|scene| scene.store().is_active()));
        assert!(!session.is_started());
        assert!(driver.keymap_mut().is_empty());
    }
}

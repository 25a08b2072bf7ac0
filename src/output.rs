use std::io::{self, Write};

use serde::Serialize;

use crate::domain::Launch;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbortResult {
    pub flight_number: u32,
    pub aborted: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub imported: usize,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_launches(launches: &[Launch]) -> io::Result<()> {
        Self::print_json(&launches)
    }

    pub fn print_launch(launch: &Launch) -> io::Result<()> {
        Self::print_json(launch)
    }

    pub fn print_abort(result: &AbortResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_sync(result: &SyncResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value)
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

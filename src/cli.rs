// Command-line surface.

use crate::app::{DEFAULT_INTERVAL, FocusConfig};
use crate::camera::Backend;
use crate::error::Error;
use crate::model::CameraModel;
use clap::Parser;
use std::io::{self, Write};
use std::time::Duration;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(author, version, about = "Live preview for focusing a Starlight Xpress CCD camera")]
pub struct Args {
    /// Camera model override, e.g. MX5, HX9C ([H|M]X[5|7|9][C])
    #[arg(short, long)]
    pub model: Option<String>,

    /// Use the built-in star field instead of a real camera
    #[arg(long)]
    pub simulate: bool,

    /// Delay between frames, in milliseconds
    #[arg(long, default_value_t = DEFAULT_INTERVAL.as_millis() as u64)]
    pub interval_ms: u64,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Settings for startup. Override problems are printed to stdout, never fatal.
    pub fn config(&self) -> Result<FocusConfig, Error> {
        self.config_to(&mut io::stdout().lock())
    }

    /// Same as `config`, with diagnostics written to `out`.
    pub fn config_to(&self, out: &mut impl Write) -> Result<FocusConfig, Error> {
        let mut model = CameraModel::default();
        if let Some(designation) = &self.model {
            for warning in model.apply_override(designation) {
                writeln!(out, "{warning}")?;
                warn!(%designation, "{warning}");
            }
            writeln!(out, "SX model now: 0x{:02X}", model.code())?;
        }
        Ok(FocusConfig {
            backend: if self.simulate { Backend::Simulated } else { Backend::Sx },
            model,
            interval: Duration::from_millis(self.interval_ms),
        })
    }
}

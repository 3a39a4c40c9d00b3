//! Subcommand implementations

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use nibbler_core::{CoreError, CoreEvent, Driver, StepObservation};
use nibbler_spec::image::MAGIC;
use nibbler_spec::{Config, MemoryImage};

/// Read an image file, or assemble the file if it is not one
pub fn load_input(path: &Path) -> Result<MemoryImage> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    if bytes.starts_with(&MAGIC.to_le_bytes()) {
        tracing::debug!(path = %path.display(), "loading image");
        return MemoryImage::from_bytes(&bytes).with_context(|| format!("decoding {}", path.display()));
    }

    let source = String::from_utf8(bytes)
        .with_context(|| format!("{} is neither an image nor UTF-8 source", path.display()))?;
    tracing::debug!(path = %path.display(), "assembling source");
    nibbler_assembler::assemble(&source).with_context(|| format!("assembling {}", path.display()))
}

/// Assemble `source` into `output`, returning the image digest
pub fn assemble_file(source: &Path, output: &Path) -> Result<String> {
    let text = fs::read_to_string(source).with_context(|| format!("reading {}", source.display()))?;
    let image = nibbler_assembler::assemble(&text).with_context(|| format!("assembling {}", source.display()))?;
    let bytes = image.to_bytes()?;
    fs::write(output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(code = image.code.len(), data = image.data.len(), bytes = bytes.len(), "image written");
    Ok(image.digest()?)
}

pub fn disasm(image: &MemoryImage, source: bool) -> Result<String> {
    let text = if source {
        nibbler_disassembler::to_source(image)?
    } else {
        nibbler_disassembler::disassemble(image)?
    };
    Ok(text)
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub config: Config,
    pub max_steps: usize,
    pub verify: bool,
}

#[derive(Debug)]
pub struct RunReport {
    pub steps: Vec<StepObservation>,
    pub events: Vec<CoreEvent>,
    pub cycles: u64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            writeln!(f, "ip={:#04x}  {:<6} -> {:#04x}", step.ip, step.opcode, step.next_ip)?;
        }
        writeln!(f, "stopped after {} steps ({} clocks)", self.steps.len(), self.cycles)
    }
}

/// Reset, program over SPI, optionally read back, then step until STOP
pub fn run(image: &MemoryImage, options: &RunOptions) -> Result<RunReport> {
    let mut driver = Driver::new(options.config);
    driver.reset();
    driver.load(image);
    if options.verify {
        driver.verify(image).context("image read-back failed")?;
    }
    driver.enter_execution();

    let steps = match driver.run_until_stop(options.max_steps) {
        Ok(steps) => steps,
        Err(CoreError::StepLimitExceeded { limit }) => {
            bail!("no STOP within {} steps", limit)
        }
        Err(e) => return Err(e.into()),
    };

    let cycles = driver.core().cycle();
    let events = driver.core_mut().drain_events();
    Ok(RunReport { steps, events, cycles })
}

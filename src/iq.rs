use anyhow::{Context, Result};
use num_complex::Complex;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Reads 8-byte IQ records: f32 LE real part, then f32 LE imaginary part.
pub struct IqReader<R: Read> {
    inner: R,
}

impl<R: Read> IqReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Next sample, or `None` at end of stream. A truncated trailing
    /// record also ends the stream.
    pub fn read_sample(&mut self) -> Result<Option<Complex<f32>>> {
        let mut buf = [0u8; 8];
        match self.inner.read_exact(&mut buf) {
            Ok(()) => {
                let re = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
                let im = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
                Ok(Some(Complex::new(re, im)))
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
            Err(e) => Err(e).context("Failed to read IQ sample"),
        }
    }
}

/// Writes IQ records in the same layout the reader consumes.
pub struct IqWriter<W: Write> {
    inner: W,
}

impl<W: Write> IqWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn write_sample(&mut self, sample: Complex<f32>) -> Result<()> {
        self.inner
            .write_all(&sample.re.to_le_bytes())
            .context("Failed to write IQ sample")?;
        self.inner
            .write_all(&sample.im.to_le_bytes())
            .context("Failed to write IQ sample")?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        self.inner.flush().context("Failed to flush output")?;
        Ok(())
    }
}

pub fn open_input<P: AsRef<Path>>(path: P) -> Result<IqReader<BufReader<File>>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Cannot open input file: {}", path.display()))?;
    Ok(IqReader::new(BufReader::new(file)))
}

pub fn create_output<P: AsRef<Path>>(path: P) -> Result<IqWriter<BufWriter<File>>> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Cannot create output file: {}", path.display()))?;
    Ok(IqWriter::new(BufWriter::new(file)))
}

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Cursor, Read, Seek},
    path::Path,
};

/// An input that can be read more than once, so that several parsers can be tried on it.
pub enum MultipleReader {
    File(File),
    Bytes(Vec<u8>),
}

impl MultipleReader {
    /**
     * Opens a file; `-` denotes standard input, which is read completely into memory.
     */
    pub fn open(path: &Path) -> Result<Self> {
        if path.as_os_str() == "-" {
            Self::from_stdin()
        } else {
            let file = File::open(path)
                .with_context(|| format!("could not read file `{}`", path.display()))?;
            Ok(Self::File(file))
        }
    }

    pub fn from_stdin() -> Result<Self> {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("could not read from STDIN")?;
        log::info!("read {} bytes from STDIN", buf.len());
        Ok(Self::Bytes(buf))
    }

    pub fn get(&mut self) -> Result<Box<dyn BufRead + '_>> {
        match self {
            MultipleReader::File(file) => {
                file.seek(io::SeekFrom::Start(0))?;
                Ok(Box::new(BufReader::new(file)))
            }
            MultipleReader::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes))),
        }
    }
}

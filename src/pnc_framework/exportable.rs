use anyhow::Result;

pub trait Exportable {
    fn export(&self, f: &mut dyn std::io::Write) -> Result<()>;
}

impl Exportable for String {
    fn export(&self, f: &mut dyn std::io::Write) -> Result<()> {
        Ok(write!(f, "{}", self)?)
    }
}

impl Exportable for f64 {
    fn export(&self, f: &mut dyn std::io::Write) -> Result<()> {
        Ok(writeln!(f, "{}", self)?)
    }
}

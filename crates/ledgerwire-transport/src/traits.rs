use crate::error::Result;

/// Size of a single HID report, in bytes.
pub const REPORT_SIZE: usize = 64;

/// A channel that moves whole 64-byte HID reports.
///
/// Both operations are atomic at the report level: a write hands one full
/// report to the device, a read returns one full report from it. The returned
/// count is how many bytes the underlying device actually moved, so callers
/// can detect a transport that breaks this contract.
///
/// Implementations block until the device completes the operation or fails.
pub trait HidTransport {
    /// Write one report. Returns the number of report bytes written.
    fn write_report(&mut self, report: &[u8; REPORT_SIZE]) -> Result<usize>;

    /// Read one report into `buf`. Returns the number of bytes read.
    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize>;
}

impl<T: HidTransport + ?Sized> HidTransport for &mut T {
    fn write_report(&mut self, report: &[u8; REPORT_SIZE]) -> Result<usize> {
        (**self).write_report(report)
    }

    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize> {
        (**self).read_report(buf)
    }
}

impl<T: HidTransport + ?Sized> HidTransport for Box<T> {
    fn write_report(&mut self, report: &[u8; REPORT_SIZE]) -> Result<usize> {
        (**self).write_report(report)
    }

    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize> {
        (**self).read_report(buf)
    }
}

use std::collections::VecDeque;

use crate::error::{Result, TransportError};
use crate::traits::{HidTransport, REPORT_SIZE};

/// Queue-backed transport.
///
/// Every written report is recorded. Reads are served from an inbound queue
/// that tests fill up front. Inbound entries are arbitrary byte vectors so a
/// test can model a device that breaks the whole-report contract.
///
/// In loopback mode written reports are also appended to the inbound queue.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    inbound: VecDeque<Vec<u8>>,
    outbound: Vec<[u8; REPORT_SIZE]>,
    loopback: bool,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that reads back whatever it writes.
    pub fn loopback() -> Self {
        Self {
            loopback: true,
            ..Self::default()
        }
    }

    /// Queue a report for a later read.
    pub fn push_inbound(&mut self, report: impl Into<Vec<u8>>) {
        self.inbound.push_back(report.into());
    }

    /// Queue several reports for later reads.
    pub fn extend_inbound<I, R>(&mut self, reports: I)
    where
        I: IntoIterator<Item = R>,
        R: Into<Vec<u8>>,
    {
        self.inbound.extend(reports.into_iter().map(Into::into));
    }

    /// Reports not yet read.
    pub fn pending_inbound(&self) -> usize {
        self.inbound.len()
    }

    /// Every report written so far, in order.
    pub fn outbound(&self) -> &[[u8; REPORT_SIZE]] {
        &self.outbound
    }

    /// Drain the written reports.
    pub fn take_outbound(&mut self) -> Vec<[u8; REPORT_SIZE]> {
        std::mem::take(&mut self.outbound)
    }
}

impl HidTransport for MemoryTransport {
    fn write_report(&mut self, report: &[u8; REPORT_SIZE]) -> Result<usize> {
        self.outbound.push(*report);
        if self.loopback {
            self.inbound.push_back(report.to_vec());
        }
        Ok(REPORT_SIZE)
    }

    fn read_report(&mut self, buf: &mut [u8; REPORT_SIZE]) -> Result<usize> {
        let report = self.inbound.pop_front().ok_or(TransportError::Closed)?;
        let n = report.len().min(REPORT_SIZE);
        buf[..n].copy_from_slice(&report[..n]);
        Ok(report.len())
    }
}

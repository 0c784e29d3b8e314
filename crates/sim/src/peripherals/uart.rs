// LabWired - Firmware Simulation Platform
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::SimResult;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Write-only pseudo-UART: the low byte of every word stored to offset 0 is transmitted.
#[derive(Debug, Default, serde::Serialize)]
pub struct StatusUart {
    #[serde(skip)]
    sink: Option<Arc<Mutex<Vec<u8>>>>,
    echo_stdout: bool,
    transmitted: u64,
}

impl StatusUart {
    pub fn new() -> Self {
        Self {
            sink: None,
            echo_stdout: true,
            transmitted: 0,
        }
    }

    fn push_tx(&mut self, value: u8) {
        self.transmitted += 1;
        if let Some(sink) = &self.sink {
            if let Ok(mut guard) = sink.lock() {
                guard.push(value);
            }
        }

        if self.echo_stdout {
            #[allow(unused_must_use)]
            {
                print!("{}", value as char);
                io::stdout().flush();
            }
        }
    }

    pub fn set_sink(&mut self, sink: Option<Arc<Mutex<Vec<u8>>>>, echo_stdout: bool) {
        self.sink = sink;
        self.echo_stdout = echo_stdout;
    }
}

impl crate::Peripheral for StatusUart {
    fn read(&mut self, _offset: u32) -> SimResult<u32> {
        Ok(0)
    }

    fn write(&mut self, offset: u32, value: u32) -> SimResult<()> {
        if offset == 0x0 {
            self.push_tx((value & 0xFF) as u8);
        }
        Ok(())
    }

    fn as_any(&self) -> Option<&dyn std::any::Any> {
        Some(self)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn std::any::Any> {
        Some(self)
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::StatusUart;
    use crate::Peripheral;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_transmit_low_byte_of_each_word() {
        let mut uart = StatusUart::new();
        let sink = Arc::new(Mutex::new(Vec::new()));
        uart.set_sink(Some(sink.clone()), false);

        uart.write(0x0, b'O' as u32).unwrap();
        uart.write(0x0, 0x1234_5600 | b'K' as u32).unwrap();
        // Other offsets are not the transmit register.
        uart.write(0x4, b'X' as u32).unwrap();

        let data = sink.lock().unwrap().clone();
        assert_eq!(data, b"OK".to_vec());
        assert_eq!(uart.snapshot()["transmitted"], 2);
    }
}

use std::sync::mpsc::{self, Receiver, SyncSender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use co2watch_frame::{check_crc, decode_frame, Decoded, FrameError, RawFrame, FRAME_SIZE};
use co2watch_hid::{DeviceTransport, SensorDevice, PRODUCT_ID, VENDOR_ID};
use tracing::{debug, trace, warn};

use crate::cancel::CancelToken;
use crate::error::Result;
use crate::handshake::handshake;
use crate::reading::Reading;

/// Default gap between device polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Fixed timeout for one blocking device read.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Session parameters. The defaults match the supported device; tests
/// swap in whatever a scripted transport needs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub vendor_id: u16,
    pub product_id: u16,
    pub poll_interval: Duration,
    pub read_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            vendor_id: VENDOR_ID,
            product_id: PRODUCT_ID,
            poll_interval: DEFAULT_POLL_INTERVAL,
            read_timeout: READ_TIMEOUT,
        }
    }
}

/// A running device session.
///
/// Iterate to consume readings; the iterator ends when the session is
/// cancelled. Dropping the session also cancels it and waits for the
/// polling loop to release the device.
pub struct Session {
    readings: Option<Receiver<Reading>>,
    cancel: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl Session {
    /// Open the configured device, handshake, and start polling.
    pub fn start(cancel: CancelToken, config: SessionConfig) -> Result<Self> {
        let transport = SensorDevice::open_first(config.vendor_id, config.product_id)?;
        Self::start_with_transport(transport, cancel, config)
    }

    /// Start a session over an already-open transport.
    ///
    /// This is the seam for tests and for callers that manage device
    /// discovery themselves. The handshake still runs here; a transport
    /// that rejects it aborts the session before any reading is produced.
    pub fn start_with_transport<T: DeviceTransport>(
        mut transport: T,
        cancel: CancelToken,
        config: SessionConfig,
    ) -> Result<Self> {
        handshake(&mut transport)?;

        // Rendezvous channel: every reading is handed off directly to the
        // consumer, so emission is strictly serialized and a slow consumer
        // slows the poll cadence instead of piling up readings.
        let (tx, rx) = mpsc::sync_channel(0);

        let loop_cancel = cancel.clone();
        let worker = thread::Builder::new()
            .name("co2watch-poll".to_string())
            .spawn(move || run(transport, loop_cancel, config, tx))?;

        debug!("session started");

        Ok(Self {
            readings: Some(rx),
            cancel,
            worker: Some(worker),
        })
    }
}

impl Iterator for Session {
    type Item = Reading;

    fn next(&mut self) -> Option<Reading> {
        self.readings.as_ref().and_then(|rx| rx.recv().ok())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel.cancel();
        // Drop the receiver first so a loop parked on the hand-off wakes
        // up and can observe the cancellation.
        drop(self.readings.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("polling thread panicked");
            }
        }
    }
}

/// Polling loop states. One iteration moves through
/// tick -> read -> decode -> emit; cancellation and the
/// retry-on-unrecognized edge are explicit transitions.
enum LoopState {
    AwaitingTick,
    Reading,
    Decoding(RawFrame, usize),
    Emitting(Reading),
    Cancelling,
}

fn run<T: DeviceTransport>(
    mut transport: T,
    cancel: CancelToken,
    config: SessionConfig,
    readings: SyncSender<Reading>,
) {
    let mut state = LoopState::AwaitingTick;

    loop {
        state = match state {
            LoopState::AwaitingTick => {
                if cancel.wait_timeout(config.poll_interval) {
                    LoopState::Cancelling
                } else {
                    LoopState::Reading
                }
            }
            LoopState::Reading => {
                let mut frame: RawFrame = [0; FRAME_SIZE];
                match transport.read_timeout(&mut frame, config.read_timeout) {
                    Ok(len) => LoopState::Decoding(frame, len.min(FRAME_SIZE)),
                    Err(err) => LoopState::Emitting(Reading::malformed(err.to_string())),
                }
            }
            LoopState::Decoding(frame, len) => {
                let frame = &frame[..len];
                if !check_crc(frame) {
                    LoopState::Emitting(Reading::malformed(FrameError::BadCrc.to_string()))
                } else {
                    match decode_frame(frame) {
                        Ok(Decoded::Co2(ppm)) => LoopState::Emitting(Reading::co2(ppm)),
                        Ok(Decoded::Temperature(celsius)) => {
                            LoopState::Emitting(Reading::temperature(celsius))
                        }
                        Ok(Decoded::Unrecognized(code)) => {
                            // Benign frame type; re-read within the same
                            // tick until a recognized frame arrives.
                            trace!(code, "unrecognized channel code, re-reading");
                            LoopState::Reading
                        }
                        Err(err) => LoopState::Emitting(Reading::malformed(err.to_string())),
                    }
                }
            }
            LoopState::Emitting(reading) => {
                if readings.send(reading).is_ok() {
                    LoopState::AwaitingTick
                } else {
                    // Consumer dropped the stream.
                    LoopState::Cancelling
                }
            }
            LoopState::Cancelling => break,
        };
    }

    drop(transport);
    debug!("polling loop stopped, device released");
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Instant;

    use co2watch_frame::SENTINEL;
    use co2watch_hid::HidError;

    use super::*;
    use crate::handshake::INIT_REPORT_LEN;
    use crate::reading::Measurement;
    use crate::SessionError;

    enum Step {
        Frame(RawFrame),
        Timeout,
    }

    #[derive(Clone, Default)]
    struct Script {
        steps: Arc<Mutex<VecDeque<Step>>>,
        reads: Arc<AtomicUsize>,
        drops: Arc<AtomicUsize>,
    }

    impl Script {
        fn push_frame(&self, code: u8, hi: u8, lo: u8) {
            let crc = code.wrapping_add(hi).wrapping_add(lo);
            self.steps
                .lock()
                .unwrap()
                .push_back(Step::Frame([code, hi, lo, crc, SENTINEL, 0, 0, 0]));
        }

        fn push_raw(&self, frame: RawFrame) {
            self.steps.lock().unwrap().push_back(Step::Frame(frame));
        }

        fn push_timeout(&self) {
            self.steps.lock().unwrap().push_back(Step::Timeout);
        }

        fn transport(&self, accepts: usize) -> ScriptedTransport {
            ScriptedTransport {
                script: self.clone(),
                accepts,
            }
        }
    }

    struct ScriptedTransport {
        script: Script,
        accepts: usize,
    }

    impl Drop for ScriptedTransport {
        fn drop(&mut self) {
            self.script.drops.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl DeviceTransport for ScriptedTransport {
        fn send_feature_report(&mut self, _data: &[u8]) -> co2watch_hid::Result<usize> {
            Ok(self.accepts)
        }

        fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> co2watch_hid::Result<usize> {
            self.script.reads.fetch_add(1, Ordering::SeqCst);
            match self.script.steps.lock().unwrap().pop_front() {
                Some(Step::Frame(frame)) => {
                    buf[..FRAME_SIZE].copy_from_slice(&frame);
                    Ok(FRAME_SIZE)
                }
                Some(Step::Timeout) | None => Err(HidError::ReadTimeout(timeout)),
            }
        }
    }

    fn fast_config() -> SessionConfig {
        SessionConfig {
            poll_interval: Duration::from_millis(5),
            read_timeout: Duration::from_millis(50),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn emits_decoded_readings_in_capture_order() {
        let script = Script::default();
        script.push_frame(0x50, 0x01, 0x90); // 400 ppm
        script.push_frame(0x42, 0x11, 0x71); // -0.1 C

        let mut session = Session::start_with_transport(
            script.transport(INIT_REPORT_LEN),
            CancelToken::new(),
            fast_config(),
        )
        .expect("session should start");

        let first = session.next().expect("first reading");
        let second = session.next().expect("second reading");

        assert_eq!(first.measurement, Measurement::Co2 { ppm: 400 });
        assert_eq!(second.measurement, Measurement::Temperature { celsius: -0.1 });
        assert!(second.timestamp >= first.timestamp);
    }

    #[test]
    fn bad_crc_is_emitted_not_dropped() {
        let script = Script::default();
        script.push_raw([0x50, 0x01, 0x90, 0x00, SENTINEL, 0, 0, 0]);

        let mut session = Session::start_with_transport(
            script.transport(INIT_REPORT_LEN),
            CancelToken::new(),
            fast_config(),
        )
        .expect("session should start");

        let reading = session.next().expect("malformed reading");
        assert_eq!(
            reading.measurement,
            Measurement::Malformed {
                message: "bad crc".to_string()
            }
        );
    }

    #[test]
    fn read_failure_self_heals() {
        let script = Script::default();
        script.push_timeout();
        script.push_frame(0x50, 0x02, 0x00); // 512 ppm

        let mut session = Session::start_with_transport(
            script.transport(INIT_REPORT_LEN),
            CancelToken::new(),
            fast_config(),
        )
        .expect("session should start");

        let first = session.next().expect("error reading");
        match &first.measurement {
            Measurement::Malformed { message } => assert!(message.contains("timed out")),
            other => panic!("expected malformed reading, got {other:?}"),
        }

        let second = session.next().expect("recovered reading");
        assert_eq!(second.measurement, Measurement::Co2 { ppm: 512 });
    }

    #[test]
    fn unrecognized_frames_retry_within_the_same_tick() {
        let script = Script::default();
        script.push_frame(0x41, 0x00, 0x2A); // valid crc, unknown channel
        script.push_frame(0x50, 0x01, 0x90);

        let config = SessionConfig {
            poll_interval: Duration::from_millis(200),
            read_timeout: Duration::from_millis(50),
            ..SessionConfig::default()
        };
        let mut session = Session::start_with_transport(
            script.transport(INIT_REPORT_LEN),
            CancelToken::new(),
            config,
        )
        .expect("session should start");

        let reading = session.next().expect("recognized reading");
        assert_eq!(reading.measurement, Measurement::Co2 { ppm: 400 });
        // Both frames were consumed by the first tick.
        assert_eq!(script.reads.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn cancellation_closes_stream_and_releases_device_once() {
        let script = Script::default();
        let cancel = CancelToken::new();

        let config = SessionConfig {
            poll_interval: Duration::from_millis(500),
            read_timeout: Duration::from_millis(50),
            ..SessionConfig::default()
        };
        let mut session =
            Session::start_with_transport(script.transport(INIT_REPORT_LEN), cancel.clone(), config)
                .expect("session should start");

        let start = Instant::now();
        cancel.cancel();
        while session.next().is_some() {}
        assert!(start.elapsed() < Duration::from_millis(500));

        drop(session);
        assert_eq!(script.drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_the_session_cancels_the_loop() {
        let script = Script::default();
        script.push_frame(0x50, 0x01, 0x90);

        let session = Session::start_with_transport(
            script.transport(INIT_REPORT_LEN),
            CancelToken::new(),
            fast_config(),
        )
        .expect("session should start");

        drop(session);
        assert_eq!(script.drops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handshake_rejection_aborts_start() {
        let script = Script::default();
        let result = Session::start_with_transport(
            script.transport(3),
            CancelToken::new(),
            fast_config(),
        );

        assert!(matches!(
            result,
            Err(SessionError::HandshakeFailed {
                written: 3,
                expected: 9
            })
        ));
        // The transport was still released exactly once.
        assert_eq!(script.drops.load(Ordering::SeqCst), 1);
    }
}

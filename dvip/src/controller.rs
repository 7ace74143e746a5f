use crate::{
    config::DvipConfig,
    error::Error,
    operation::{Dispatch, Operation, SpeedChange},
    protocol::{
        command::{
            Adjust, ExposureMode, Focus, FocusMode, OsdButton, PanTiltDirection, TallyColour,
            FULL_STATUS_INQUIRY,
        },
        is_acknowledgement, Command, CustomCommand, Frame, ACK_PACKET,
    },
    state::{ConnectionState, DvipState, SpeedState, StateUpdate},
    tcp::DvipTcpChannel,
    Result,
};
use concread::cowcell::asynch::{CowCell, CowCellReadTxn};
use futures::StreamExt;
use std::{sync::Arc, time::Duration};
use tokio::{
    select,
    sync::{
        broadcast::{self, Receiver},
        mpsc::{self, Sender},
        oneshot,
    },
    task::JoinHandle,
    time::{interval_at, timeout, Instant},
};
use tokio_stream::wrappers::IntervalStream;

/// Internal type for asynchronous message passing.
enum AsyncCommand {
    /// Run an [Operation], and report whether it was valid.
    Run {
        op: Operation,
        responder: oneshot::Sender<Result>,
    },

    /// A delayed step of a timed sequence, sent by the timer task.
    ///
    /// Steps from a cancelled sequence have a stale `generation`, and are
    /// dropped.
    TimedStep { generation: u64, cmd: Command },

    /// Tear down the connection, and reconnect with new settings.
    Configure {
        config: DvipConfig,
        responder: oneshot::Sender<()>,
    },

    /// Tear down the connection, and stop the receiver task.
    Destroy { responder: oneshot::Sender<()> },
}

#[allow(rustdoc::private_intra_doc_links)]
/// [DvipController] manages a session with a single camera.
///
/// ## General design
///
/// Each session is run by a [DvipReceiver] task, which owns the TCP
/// connection, the session's [SpeedState], the status poll timer and any
/// timed zoom in progress. [DvipController] passes it requests over a
/// channel, so they are handled one at a time, in order.
///
/// Snapshots of session state are published to [`get_state()`][Self::get_state]
/// and [`state_update_events()`][Self::state_update_events].
///
/// ## Errors
///
/// Methods only return errors for invalid requests (eg: unknown speed ids,
/// malformed custom commands). Connection problems are logged and reflected
/// in [ConnectionState]; commands sent while not connected are dropped.
pub struct DvipController {
    cmd_tx: Sender<AsyncCommand>,

    /// State associated with the session.
    state: Arc<CowCell<DvipState>>,
    state_rx: Receiver<(CowCellReadTxn<DvipState>, StateUpdate)>,
}

impl DvipController {
    /// Starts a session, and connects to the camera if `config` has a host.
    ///
    /// The initial pan/tilt and zoom speeds are taken from `config`.
    ///
    /// This returns once the first connection attempt has finished, whether or
    /// not it succeeded.
    pub async fn new(config: DvipConfig) -> Result<Self> {
        config.validate()?;
        let speed = SpeedState::new(config.pan_tilt_speed, config.zoom_speed);
        let (receiver, cmd_tx) = DvipReceiver::new(speed);
        let state = receiver.state.clone();
        let state_rx = receiver.state_tx.subscribe();

        debug!("Spawning receiver task...");
        tokio::task::spawn(receiver.run());

        let c = Self {
            cmd_tx,
            state,
            state_rx,
        };
        c.configure(config).await?;
        Ok(c)
    }

    /// Replaces the connection settings.
    ///
    /// This drops the current connection (cancelling polling and timed zooms),
    /// then reconnects if `config` has a host. Session speeds are kept.
    pub async fn configure(&self, config: DvipConfig) -> Result {
        config.validate()?;
        let (responder, resp_rx) = oneshot::channel();
        self.send_ex(AsyncCommand::Configure { config, responder })
            .await?;
        resp_rx.await.map_err(|_| Error::ChannelUnavailable)
    }

    /// Runs an [Operation].
    ///
    /// ## Errors
    ///
    /// Only validation errors from [`Operation::dispatch()`] are returned.
    pub async fn run(&self, op: Operation) -> Result {
        // https://tokio.rs/tokio/tutorial/channels#receive-responses
        let (responder, resp_rx) = oneshot::channel();
        self.send_ex(AsyncCommand::Run { op, responder }).await?;
        resp_rx.await.map_err(|_| Error::ChannelUnavailable)?
    }

    async fn send_ex(&self, async_cmd: AsyncCommand) -> Result {
        self.cmd_tx
            .send(async_cmd)
            .await
            .map_err(|_| Error::ChannelUnavailable)
    }

    /// Drives the pan/tilt head at the current pan/tilt speed.
    pub async fn pan_tilt(&self, direction: PanTiltDirection) -> Result {
        self.run(Operation::PanTilt(direction)).await
    }

    pub async fn home(&self) -> Result {
        self.run(Operation::Home).await
    }

    /// Sets the pan/tilt speed by id (`0x01..=0x18`).
    pub async fn set_pan_tilt_speed(&self, id: u8) -> Result {
        self.run(Operation::PanTiltSpeed(SpeedChange::Set(id))).await
    }

    pub async fn pan_tilt_speed_up(&self) -> Result {
        self.run(Operation::PanTiltSpeed(SpeedChange::Up)).await
    }

    pub async fn pan_tilt_speed_down(&self) -> Result {
        self.run(Operation::PanTiltSpeed(SpeedChange::Down)).await
    }

    /// Sets the zoom speed by id (`0x00..=0x07`).
    pub async fn set_zoom_speed(&self, id: u8) -> Result {
        self.run(Operation::ZoomSpeed(SpeedChange::Set(id))).await
    }

    pub async fn zoom_speed_up(&self) -> Result {
        self.run(Operation::ZoomSpeed(SpeedChange::Up)).await
    }

    pub async fn zoom_speed_down(&self) -> Result {
        self.run(Operation::ZoomSpeed(SpeedChange::Down)).await
    }

    /// Starts zooming in at the current zoom speed.
    pub async fn zoom_in(&self) -> Result {
        self.run(Operation::ZoomIn).await
    }

    /// Starts zooming out at the current zoom speed.
    pub async fn zoom_out(&self) -> Result {
        self.run(Operation::ZoomOut).await
    }

    pub async fn zoom_stop(&self) -> Result {
        self.run(Operation::ZoomStop).await
    }

    /// Zooms in for `duration`, then stops.
    pub async fn zoom_in_for(&self, duration: Duration) -> Result {
        self.run(Operation::ZoomInFor(duration)).await
    }

    /// Zooms out for `duration`, then stops.
    pub async fn zoom_out_for(&self, duration: Duration) -> Result {
        self.run(Operation::ZoomOutFor(duration)).await
    }

    /// Zooms in for `zoom_in`, then out for `zoom_out`, then stops.
    pub async fn zoom_in_then_out(&self, zoom_in: Duration, zoom_out: Duration) -> Result {
        self.run(Operation::ZoomInThenOut { zoom_in, zoom_out })
            .await
    }

    pub async fn focus(&self, focus: Focus) -> Result {
        self.run(Operation::Focus(focus)).await
    }

    pub async fn set_focus_mode(&self, mode: FocusMode) -> Result {
        self.run(Operation::FocusMode(mode)).await
    }

    pub async fn set_exposure_mode(&self, mode: ExposureMode) -> Result {
        self.run(Operation::ExposureMode(mode)).await
    }

    pub async fn iris(&self, adjust: Adjust) -> Result {
        self.run(Operation::Iris(adjust)).await
    }

    /// Sets an iris position from [IRIS][crate::protocol::choice::IRIS].
    pub async fn set_iris(&self, position: u8) -> Result {
        self.run(Operation::SetIris(position)).await
    }

    pub async fn shutter(&self, adjust: Adjust) -> Result {
        self.run(Operation::Shutter(adjust)).await
    }

    /// Sets a shutter position from
    /// [SHUTTER][crate::protocol::choice::SHUTTER].
    pub async fn set_shutter(&self, position: u8) -> Result {
        self.run(Operation::SetShutter(position)).await
    }

    pub async fn save_preset(&self, slot: u8) -> Result {
        self.run(Operation::SavePreset(slot)).await
    }

    pub async fn recall_preset(&self, slot: u8) -> Result {
        self.run(Operation::RecallPreset(slot)).await
    }

    pub async fn set_preset_drive_speed(&self, slot: u8, speed: u8) -> Result {
        self.run(Operation::PresetDriveSpeed { slot, speed }).await
    }

    pub async fn set_tally(&self, colour: TallyColour) -> Result {
        self.run(Operation::Tally(colour)).await
    }

    pub async fn osd(&self, button: OsdButton) -> Result {
        self.run(Operation::Osd(button)).await
    }

    /// Sends a raw command, given as hex (eg: `"81 01 04 00 02 FF"`).
    ///
    /// ## Errors
    ///
    /// * [`InvalidFormat`][crate::protocol::Error::InvalidFormat] when `hex`
    ///   is not a valid [CustomCommand]
    pub async fn custom(&self, hex: &str) -> Result {
        let cmd: CustomCommand = hex.parse()?;
        self.run(Operation::Custom(cmd)).await
    }

    /// Sends a status inquiry now.
    pub async fn request_state(&self) -> Result {
        self.run(Operation::RequestState).await
    }

    pub async fn get_state(&self) -> impl std::ops::Deref<Target = DvipState> {
        self.state.read().await
    }

    pub fn state_update_events(&self) -> Receiver<(CowCellReadTxn<DvipState>, StateUpdate)> {
        self.state_rx.resubscribe()
    }

    /// Disconnects and stops the session.
    ///
    /// Calling this more than once is harmless. Any other request after this
    /// returns [`Error::ChannelUnavailable`].
    pub async fn destroy(&self) -> Result {
        let (responder, resp_rx) = oneshot::channel();
        if self.send_ex(AsyncCommand::Destroy { responder }).await.is_err() {
            debug!("session already destroyed");
            return Ok(());
        }

        // The receiver may have stopped before handling this.
        let _ = resp_rx.await;
        Ok(())
    }
}

/// Polls `poll`, or waits forever when there is nothing to poll.
async fn next_tick(poll: &mut Option<IntervalStream>) -> Option<()> {
    match poll {
        Some(poll) => poll.next().await.map(|_| ()),
        None => std::future::pending().await,
    }
}

/// Coordinates the connection with the camera.
///
/// This runs its own event loop ([`DvipReceiver::run()`]).
struct DvipReceiver {
    config: DvipConfig,
    channel: DvipTcpChannel,
    cmd_rx: mpsc::Receiver<AsyncCommand>,
    cmd_tx_weak: mpsc::WeakSender<AsyncCommand>,
    connection: ConnectionState,
    speed: SpeedState,
    /// Status poll timer, while connected with polling enabled.
    poll: Option<IntervalStream>,
    /// Timer task for the current timed sequence.
    zoom_timer: Option<JoinHandle<()>>,
    /// Incremented whenever a timed sequence is cancelled.
    zoom_generation: u64,
    state: Arc<CowCell<DvipState>>,
    state_tx: broadcast::Sender<(CowCellReadTxn<DvipState>, StateUpdate)>,
}

impl DvipReceiver {
    const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
    const POLL_INTERVAL: Duration = Duration::from_millis(1000);

    /// Depth of the command transmit buffer.
    const COMMAND_CHANNEL_SIZE: usize = 16;
    const STATE_CHANNEL_SIZE: usize = 16;

    fn new(speed: SpeedState) -> (Self, mpsc::Sender<AsyncCommand>) {
        let (cmd_tx, cmd_rx) = mpsc::channel(Self::COMMAND_CHANNEL_SIZE);
        let cmd_tx_weak = cmd_tx.downgrade();
        let (state_tx, _) = broadcast::channel(Self::STATE_CHANNEL_SIZE);
        let connection = ConnectionState::default();
        (
            Self {
                config: DvipConfig::default(),
                channel: DvipTcpChannel::new(),
                cmd_rx,
                cmd_tx_weak,
                connection,
                speed,
                poll: None,
                zoom_timer: None,
                zoom_generation: 0,
                state: Arc::new(CowCell::new(DvipState { connection, speed })),
                state_tx,
            },
            cmd_tx,
        )
    }

    async fn run(mut self) {
        debug!("starting main_loop");
        self.main_loop().await;
        self.teardown().await;
        debug!("receiver task done");
    }

    /// Starts the main event loop. There are three sources of events:
    ///
    /// * `cmd_rx.recv`: [requests from the controller][Self::handle_queued_command],
    ///   and timed sequence steps.
    ///
    /// * `channel.recv`: [data from the camera][Self::handle_incoming_data].
    ///   Errors here drop the connection.
    ///
    /// * `poll`: sends a status inquiry, when enabled.
    ///
    /// This returns when the session is destroyed, or the controller is
    /// dropped.
    async fn main_loop(&mut self) {
        loop {
            select! {
                async_cmd = self.cmd_rx.recv() => {
                    let Some(async_cmd) = async_cmd else {
                        debug!("controller dropped, stopping main_loop");
                        return;
                    };

                    if !self.handle_queued_command(async_cmd).await {
                        info!("stopping main_loop");
                        return;
                    }
                }

                r = self.channel.recv(), if self.channel.is_connected() => match r {
                    Ok(data) => self.handle_incoming_data(&data),
                    Err(e) => {
                        warn!("connection to camera lost: {e}");
                        self.teardown().await;
                    }
                },

                Some(()) = next_tick(&mut self.poll) => {
                    self.send(&Command::from(FULL_STATUS_INQUIRY)).await;
                }
            }
        }
    }

    /// Handles a request from the controller.
    ///
    /// Returns `false` when the main loop should stop.
    async fn handle_queued_command(&mut self, async_cmd: AsyncCommand) -> bool {
        match async_cmd {
            AsyncCommand::Run { op, responder } => {
                let r = self.run_operation(op).await;
                // It doesn't matter whether the caller is still waiting
                let _ = responder.send(r);
            }

            AsyncCommand::TimedStep { generation, cmd } => {
                if generation == self.zoom_generation {
                    self.send(&cmd).await;
                } else {
                    trace!("dropping cancelled step: {cmd:?}");
                }
            }

            AsyncCommand::Configure { config, responder } => {
                info!("applying new configuration");
                self.teardown().await;
                self.config = config;
                self.connect().await;
                let _ = responder.send(());
            }

            AsyncCommand::Destroy { responder } => {
                info!("destroying session");
                self.teardown().await;
                let _ = responder.send(());
                return false;
            }
        }

        true
    }

    async fn run_operation(&mut self, op: Operation) -> Result {
        let mut speed = self.speed;
        let dispatch = op.dispatch(&mut speed)?;
        let updated = speed.changes(&self.speed);
        self.speed = speed;
        if !updated.is_empty() {
            debug!(speed = ?self.speed, "updated");
            self.publish(updated).await;
        }

        if op.is_zoom() {
            self.cancel_timed_steps();
        }

        match dispatch {
            Dispatch::None => (),
            Dispatch::Immediate(cmd) => self.send(&cmd).await,
            Dispatch::Sequence { first, then } => {
                self.send(&first).await;
                if self.channel.is_connected() {
                    self.schedule(then);
                }
            }
        }

        Ok(())
    }

    /// Sends each command in `steps` after its delay, from a timer task.
    fn schedule(&mut self, steps: Vec<(Duration, Command)>) {
        let generation = self.zoom_generation;
        let cmd_tx = self.cmd_tx_weak.clone();
        self.zoom_timer = Some(tokio::task::spawn(async move {
            for (delay, cmd) in steps {
                tokio::time::sleep(delay).await;
                let Some(cmd_tx) = cmd_tx.upgrade() else {
                    break;
                };
                if cmd_tx
                    .send(AsyncCommand::TimedStep { generation, cmd })
                    .await
                    .is_err()
                {
                    break;
                }
            }
        }));
    }

    fn cancel_timed_steps(&mut self) {
        self.zoom_generation = self.zoom_generation.wrapping_add(1);
        if let Some(zoom_timer) = self.zoom_timer.take() {
            if !zoom_timer.is_finished() {
                debug!("cancelling timed zoom");
            }
            zoom_timer.abort();
        }
    }

    /// Sends a command to the camera, if connected.
    async fn send(&mut self, cmd: &Command) {
        if !self.channel.is_connected() {
            trace!("not connected, dropping {cmd:?}");
            return;
        }

        let frame = match cmd
            .to_bytes()
            .and_then(|payload| Frame::new(self.config.device_address, payload))
        {
            Ok(frame) => frame,
            Err(e) => {
                error!("cannot encode {cmd:?}: {e}");
                return;
            }
        };

        trace!(">>> {cmd:?}");
        if let Err(e) = self.channel.send(&frame, self.config.length_mode).await {
            error!("error sending to camera: {e}");
            self.teardown().await;
        }
    }

    fn handle_incoming_data(&self, mut data: &[u8]) {
        while data.len() >= ACK_PACKET.len() && is_acknowledgement(&data[..ACK_PACKET.len()]) {
            trace!("<<< ack");
            data = &data[ACK_PACKET.len()..];
        }

        if !data.is_empty() {
            debug!("<<< unhandled data: {}", hex::encode(data));
        }
    }

    /// Connects to the configured camera, if any.
    async fn connect(&mut self) {
        let Some(host) = self.config.host.clone() else {
            info!("no camera configured");
            return;
        };
        let port = self.config.port;

        self.set_connection(ConnectionState::Connecting).await;
        info!("connecting to {host}:{port}...");
        let r = timeout(
            Self::CONNECT_TIMEOUT,
            self.channel.connect((host.as_str(), port)),
        )
        .await
        .unwrap_or(Err(Error::Timeout));

        if let Err(e) = r {
            error!("could not connect to {host}:{port}: {e}");
            self.channel.close();
            self.set_connection(ConnectionState::Error).await;
            return;
        }

        self.set_connection(ConnectionState::Connected).await;
        if self.config.poll {
            debug!("polling camera state every {:?}", Self::POLL_INTERVAL);
            self.poll = Some(IntervalStream::new(interval_at(
                Instant::now() + Self::POLL_INTERVAL,
                Self::POLL_INTERVAL,
            )));
        }
    }

    /// Stops polling and timed sequences, and closes the connection.
    async fn teardown(&mut self) {
        self.poll = None;
        self.cancel_timed_steps();
        self.channel.close();
        self.set_connection(ConnectionState::Disconnected).await;
    }

    async fn set_connection(&mut self, connection: ConnectionState) {
        if self.connection == connection {
            return;
        }

        info!("connection: {:?} -> {connection:?}", self.connection);
        self.connection = connection;
        self.publish(StateUpdate::CONNECTION_STATE).await;
    }

    async fn publish(&self, updated_fields: StateUpdate) {
        let mut w = self.state.write().await;
        w.connection = self.connection;
        w.speed = self.speed;
        w.commit().await;

        // It doesn't matter whether this actually succeeds
        let _ = self.state_tx.send((self.state.read().await, updated_fields));
    }
}

impl Drop for DvipReceiver {
    fn drop(&mut self) {
        if let Some(zoom_timer) = self.zoom_timer.take() {
            zoom_timer.abort();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::protocol::LengthMode;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::{TcpListener, TcpStream},
    };

    const WAIT: Duration = Duration::from_secs(3);

    async fn camera() -> Result<(TcpListener, DvipConfig)> {
        let _ = tracing_subscriber::fmt().try_init();
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let config = DvipConfig {
            port: listener.local_addr()?.port(),
            ..DvipConfig::new("127.0.0.1")
        };
        Ok((listener, config))
    }

    /// Reads one [LengthMode::Body] frame.
    async fn read_frame(sock: &mut TcpStream) -> Result<Vec<u8>> {
        let length = timeout(WAIT, sock.read_u16())
            .await
            .map_err(|_| Error::Timeout)??;
        let mut out = length.to_be_bytes().to_vec();
        let mut b = vec![0; usize::from(length)];
        sock.read_exact(&mut b).await?;
        out.extend(b);
        Ok(out)
    }

    async fn next_event(
        events: &mut Receiver<(CowCellReadTxn<DvipState>, StateUpdate)>,
    ) -> Result<(CowCellReadTxn<DvipState>, StateUpdate)> {
        timeout(WAIT, events.recv())
            .await
            .map_err(|_| Error::Timeout)?
            .map_err(|_| Error::ChannelUnavailable)
    }

    #[tokio::test]
    async fn pan_left() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(config).await?;
        assert_eq!(ConnectionState::Connected, c.get_state().await.connection);
        let (mut cam, _) = listener.accept().await?;

        // Acknowledgements are ignored
        cam.write_all(&ACK_PACKET).await?;
        cam.write_all(&ACK_PACKET).await?;

        c.pan_tilt(PanTiltDirection::Left).await?;
        assert_eq!(
            hex::decode("0009810106010c0c0103ff")?,
            read_frame(&mut cam).await?
        );

        c.custom("8 1 09 04 3F 02 00 FF").await?;
        assert_eq!(
            hex::decode("0008818109043f0200ff")?,
            read_frame(&mut cam).await?
        );

        assert_eq!(ConnectionState::Connected, c.get_state().await.connection);
        c.destroy().await?;
        Ok(())
    }

    #[tokio::test]
    async fn packet_length_and_address() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(DvipConfig {
            device_address: 3,
            length_mode: LengthMode::Packet,
            ..config
        })
        .await?;
        let (mut cam, _) = listener.accept().await?;

        c.home().await?;
        let mut b = [0; 7];
        timeout(WAIT, cam.read_exact(&mut b))
            .await
            .map_err(|_| Error::Timeout)??;
        assert_eq!(hex::decode("000783010604ff")?, b);
        Ok(())
    }

    #[tokio::test]
    async fn disconnected_drops_commands() -> Result<()> {
        let c = DvipController::new(DvipConfig::default()).await?;
        assert_eq!(ConnectionState::Disconnected, c.get_state().await.connection);

        c.pan_tilt(PanTiltDirection::Up).await?;
        c.zoom_in_for(Duration::from_millis(10)).await?;
        c.request_state().await?;

        // Session state still changes
        c.set_zoom_speed(0x03).await?;
        assert_eq!(0x03, c.get_state().await.speed.zoom_speed());
        Ok(())
    }

    #[tokio::test]
    async fn connect_error() -> Result<()> {
        let (listener, config) = camera().await?;
        drop(listener);

        let c = DvipController::new(config).await?;
        assert_eq!(ConnectionState::Error, c.get_state().await.connection);

        // Commands are dropped, not errors
        c.home().await?;
        Ok(())
    }

    #[tokio::test]
    async fn invalid_requests() -> Result<()> {
        assert!(matches!(
            DvipController::new(DvipConfig {
                device_address: 0,
                ..Default::default()
            })
            .await,
            Err(Error::InvalidConfig(_))
        ));

        let c = DvipController::new(DvipConfig::default()).await?;
        assert!(matches!(
            c.custom("01 04 00 02 FF").await,
            Err(Error::Protocol(crate::protocol::Error::InvalidFormat))
        ));
        assert!(matches!(
            c.set_pan_tilt_speed(0x19).await,
            Err(Error::Protocol(crate::protocol::Error::NotFound(0x19)))
        ));
        assert!(matches!(
            c.recall_preset(0x40).await,
            Err(Error::Protocol(
                crate::protocol::Error::ParameterOutOfRange
            ))
        ));
        assert!(matches!(
            c.zoom_out_for(Duration::from_secs(100)).await,
            Err(Error::ParameterOutOfRange)
        ));
        assert_eq!(SpeedState::default(), c.get_state().await.speed);
        Ok(())
    }

    #[tokio::test]
    async fn speed_events() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(config).await?;
        let (mut cam, _) = listener.accept().await?;
        let mut events = c.state_update_events();

        c.pan_tilt_speed_up().await?;
        let (state, updated) = next_event(&mut events).await?;
        assert_eq!(StateUpdate::PAN_TILT_SPEED, updated);
        assert_eq!(0x0d, state.speed.pan_tilt_speed());

        // Already at the fastest zoom speed, so nothing changes.
        c.zoom_speed_up().await?;
        c.zoom_speed_down().await?;
        let (state, updated) = next_event(&mut events).await?;
        assert_eq!(StateUpdate::ZOOM_SPEED, updated);
        assert_eq!(0x06, state.speed.zoom_speed());

        c.pan_tilt(PanTiltDirection::Right).await?;
        assert_eq!(
            hex::decode("0009810106010d0d0203ff")?,
            read_frame(&mut cam).await?
        );
        c.zoom_in().await?;
        assert_eq!(hex::decode("00068101040726ff")?, read_frame(&mut cam).await?);
        Ok(())
    }

    #[tokio::test]
    async fn poll() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(DvipConfig {
            poll: true,
            ..config
        })
        .await?;
        let (mut cam, _) = listener.accept().await?;

        for _ in 0..2 {
            assert_eq!(hex::decode("000681097e7e70ff")?, read_frame(&mut cam).await?);
        }

        // Stopped by reconfiguring.
        c.configure(DvipConfig::default()).await?;
        assert_eq!(0, timeout(WAIT, cam.read(&mut [0; 8])).await.map_err(|_| Error::Timeout)??);
        assert_eq!(ConnectionState::Disconnected, c.get_state().await.connection);
        Ok(())
    }

    #[tokio::test]
    async fn timed_zoom() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(config).await?;
        let (mut cam, _) = listener.accept().await?;

        c.zoom_in_for(Duration::from_millis(100)).await?;
        assert_eq!(hex::decode("00068101040727ff")?, read_frame(&mut cam).await?);
        assert_eq!(hex::decode("00068101040700ff")?, read_frame(&mut cam).await?);

        c.zoom_in_then_out(Duration::from_millis(50), Duration::from_millis(50))
            .await?;
        assert_eq!(hex::decode("00068101040727ff")?, read_frame(&mut cam).await?);
        assert_eq!(hex::decode("00068101040737ff")?, read_frame(&mut cam).await?);
        assert_eq!(hex::decode("00068101040700ff")?, read_frame(&mut cam).await?);
        Ok(())
    }

    #[tokio::test]
    async fn timed_zoom_cancelled() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(config).await?;
        let (mut cam, _) = listener.accept().await?;

        c.zoom_in_then_out(Duration::from_millis(300), Duration::from_millis(300))
            .await?;
        c.zoom_stop().await?;
        assert_eq!(hex::decode("00068101040727ff")?, read_frame(&mut cam).await?);
        assert_eq!(hex::decode("00068101040700ff")?, read_frame(&mut cam).await?);

        // Nothing else from the cancelled sequence
        assert!(timeout(Duration::from_millis(900), cam.read_u8())
            .await
            .is_err());
        Ok(())
    }

    #[tokio::test]
    async fn camera_disconnects() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(config).await?;
        let (cam, _) = listener.accept().await?;
        let mut events = c.state_update_events();

        drop(cam);
        let (state, updated) = next_event(&mut events).await?;
        assert_eq!(StateUpdate::CONNECTION_STATE, updated);
        assert_eq!(ConnectionState::Disconnected, state.connection);

        // No reconnection
        c.home().await?;
        assert_eq!(ConnectionState::Disconnected, c.get_state().await.connection);
        Ok(())
    }

    #[tokio::test]
    async fn reconfigure() -> Result<()> {
        let (listener1, config1) = camera().await?;
        let (listener2, config2) = camera().await?;
        let c = DvipController::new(config1).await?;
        let (mut cam1, _) = listener1.accept().await?;
        c.set_pan_tilt_speed(0x01).await?;

        c.configure(config2).await?;
        let (mut cam2, _) = listener2.accept().await?;
        assert_eq!(0, timeout(WAIT, cam1.read(&mut [0; 8])).await.map_err(|_| Error::Timeout)??);

        // Session speed survives reconfiguration
        c.pan_tilt(PanTiltDirection::Stop).await?;
        assert_eq!(
            hex::decode("00098101060101010303ff")?,
            read_frame(&mut cam2).await?
        );
        Ok(())
    }

    #[tokio::test]
    async fn destroy() -> Result<()> {
        let (listener, config) = camera().await?;
        let c = DvipController::new(config).await?;
        let (mut cam, _) = listener.accept().await?;

        c.destroy().await?;
        c.destroy().await?;
        assert_eq!(ConnectionState::Disconnected, c.get_state().await.connection);
        assert_eq!(0, timeout(WAIT, cam.read(&mut [0; 8])).await.map_err(|_| Error::Timeout)??);
        assert!(matches!(c.home().await, Err(Error::ChannelUnavailable)));
        Ok(())
    }
}

use dbus::arg::{RefArg, Variant};
use dbus::blocking::Connection;
use dbus::message::{MatchRule, Message, MessageType};
use dbus::strings::{Interface, Path};

use crate::error::{Error, Result};
use crate::scheduler::Trigger;

use log::{debug, info, warn};

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

type DBusProps = HashMap<String, Variant<Box<dyn RefArg>>>;

const TIMEOUT: Duration = Duration::from_secs(7200);

/// BlueZ object path for a device. `device` uses `_` as separator.
pub fn device_path(adapter: &str, device: &str) -> Result<Path<'static>> {
    Path::new(format!("/org/bluez/{}/dev_{}", adapter, device))
        .map_err(|_| Error::InvalidDevice(device.to_owned()))
}

/// Start a thread to send a trigger when the expected device is connected.
pub fn start(path: Path<'static>, queue: mpsc::Sender<Trigger>) {
    thread::spawn(move || {
        if let Err(e) = watch(path, queue) {
            warn!("Connection watcher stopped: {}", e);
        }
    });
}

fn watch(path: Path<'static>, queue: mpsc::Sender<Trigger>) -> Result<()> {
    // Connect to DBus and add a rule to receive messages
    let mut conn = Connection::new_system()?;

    let mut rule = MatchRule::new();
    rule.msg_type = Some(MessageType::Signal);
    rule.interface = Some(Interface::from("org.freedesktop.DBus.Properties"));

    info!("Watching connections of {}", path);
    conn.add_match(rule, move |_: (), _, msg| handle(msg, &path, &queue))?;

    // Infinite loop to wait for messages
    loop {
        conn.process(TIMEOUT)?;
    }
}

/// Handle the message sent by DBus. Returns `false`, to remove the match
/// rule, only when the scheduler is gone.
fn handle(msg: &Message, target_path: &Path, queue: &mpsc::Sender<Trigger>) -> bool {
    match msg.path() {
        Some(p) if &p == target_path => (),
        _ => return true,
    };

    let (iface, props): (Option<String>, Option<DBusProps>) = msg.get2();

    if is_connected(iface.as_deref(), props.as_ref()) {
        debug!("{} connected", target_path);
        return queue.send(Trigger::Connected).is_ok();
    }

    true
}

fn is_connected(iface: Option<&str>, props: Option<&DBusProps>) -> bool {
    let device = iface.map_or(false, |i| i.starts_with("org.bluez.Device"));

    let connected = props
        .and_then(|p| p.get("Connected").and_then(|v| v.as_u64()))
        .unwrap_or(0);

    device && connected == 1
}

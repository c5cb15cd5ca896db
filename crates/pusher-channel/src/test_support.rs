//! Deterministic queue and recording listener shared by unit tests.

use std::sync::Mutex;

use crate::dispatch::{EventQueue, Task};
use crate::listener::{ChannelEventListener, PresenceChannelEventListener};
use crate::member::Member;

/// Holds submitted tasks until `run_all` is called.
#[derive(Default)]
pub(crate) struct RecordingQueue {
    tasks: Mutex<Vec<Task>>,
}

impl RecordingQueue {
    pub(crate) fn pending(&self) -> usize {
        self.tasks.lock().unwrap().len()
    }

    pub(crate) fn run_all(&self) {
        let tasks: Vec<Task> = std::mem::take(&mut *self.tasks.lock().unwrap());
        for task in tasks {
            task();
        }
    }
}

impl EventQueue for RecordingQueue {
    fn execute(&self, task: Task) {
        self.tasks.lock().unwrap().push(task);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Event(String, String, String),
    Subscribed(String),
    UsersReceived(String, Vec<(String, Option<String>)>),
    Added(String, String, Option<String>),
    Removed(String, String),
}

#[derive(Default)]
pub(crate) struct RecordingListener {
    calls: Mutex<Vec<Call>>,
}

impl RecordingListener {
    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl ChannelEventListener for RecordingListener {
    fn on_event(&self, channel: &str, event: &str, data: &str) {
        self.record(Call::Event(channel.into(), event.into(), data.into()));
    }

    fn on_subscription_succeeded(&self, channel: &str) {
        self.record(Call::Subscribed(channel.into()));
    }
}

impl PresenceChannelEventListener for RecordingListener {
    fn on_users_information_received(&self, channel: &str, members: &[Member]) {
        let members = members
            .iter()
            .map(|m| (m.id().to_string(), m.info().map(str::to_string)))
            .collect();
        self.record(Call::UsersReceived(channel.into(), members));
    }

    fn on_user_added(&self, channel: &str, member: &Member) {
        self.record(Call::Added(
            channel.into(),
            member.id().into(),
            member.info().map(str::to_string),
        ));
    }

    fn on_user_removed(&self, channel: &str, user_id: &str) {
        self.record(Call::Removed(channel.into(), user_id.into()));
    }
}

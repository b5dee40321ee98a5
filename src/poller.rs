use std::io::{self, Write};
use std::time::Duration;

use reqwest::StatusCode;

use crate::api::{ApiReply, ChannelApi};
use crate::domain::{Channel, FeedEntry, FeedPage};
use crate::error::FetchError;
use crate::report;

/// Highest entry id already reported. Unset until the first poll that yields entries.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Watermark(Option<u64>);

impl Watermark {
    pub fn value(&self) -> Option<u64> {
        self.0
    }

    /// Keeps entries above the watermark and advances it to the highest kept id.
    pub fn take_new(&mut self, entries: Vec<FeedEntry>) -> Vec<FeedEntry> {
        let new_entries: Vec<FeedEntry> = entries
            .into_iter()
            .filter(|entry| self.0.map_or(true, |seen| entry.entry_id > seen))
            .collect();

        if let Some(max) = new_entries.iter().map(|entry| entry.entry_id).max() {
            self.0 = Some(max);
        }
        new_entries
    }
}

#[derive(Debug, PartialEq)]
pub enum PollOutcome {
    New(Vec<FeedEntry>),
    NoNewData,
    Failed,
}

pub struct Poller<A, W>
where
    A: ChannelApi,
    W: Write,
{
    api: A,
    out: W,
    watermark: Watermark,
    channel: Option<Channel>,
    results: u32,
}

impl<A, W> Poller<A, W>
where
    A: ChannelApi,
    W: Write,
{
    pub fn new(api: A, out: W, results: u32) -> Self {
        Self {
            api,
            out,
            watermark: Watermark::default(),
            channel: None,
            results,
        }
    }

    pub fn watermark(&self) -> Watermark {
        self.watermark
    }

    /// Runs until `max_polls` feed polls have completed, or forever when unset.
    pub async fn run(&mut self, interval: Duration, max_polls: Option<u64>) -> io::Result<()> {
        self.show_channel_info().await?;

        let mut polls: u64 = 0;
        loop {
            if max_polls.is_some_and(|max| polls >= max) {
                log::info!("Reached {} polls, stopping", polls);
                return Ok(());
            }
            if polls > 0 {
                tokio::time::sleep(interval).await;
            }

            self.poll_once().await?;
            polls += 1;
        }
    }

    pub async fn show_channel_info(&mut self) -> io::Result<()> {
        log::info!("Fetching channel info");
        let result = match self.api.get_channel().await {
            Ok(reply) => parse_reply(reply, Channel::from_json),
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(channel) => {
                report::channel_details(&mut self.out, &channel)?;
                self.channel = Some(channel);
                Ok(())
            }
            Err(FetchError::Status { status, body }) => {
                log::warn!("Channel info request returned {}", status);
                report::failure(&mut self.out, "Error fetching channel info", body)
            }
            Err(err) => {
                log::error!("Failed to fetch channel info with {}", err);
                report::failure(&mut self.out, "Failed to fetch channel info", err)
            }
        }
    }

    /// One feed poll. Fetch failures are reported and leave the watermark alone;
    /// only a failed write to the output is returned as an error.
    pub async fn poll_once(&mut self) -> io::Result<PollOutcome> {
        match self.watermark.value() {
            Some(seen) => log::info!("Polling feeds above entry {}", seen),
            None => log::info!("Polling feeds, no entries seen yet"),
        }

        let reply = match self.api.get_feeds(self.results).await {
            Ok(reply) => reply,
            Err(err) => {
                log::error!("Feed request failed with {}", err);
                report::failure(&mut self.out, "Failed to fetch feeds", err)?;
                return Ok(PollOutcome::Failed);
            }
        };
        report::response_meta(&mut self.out, &reply)?;

        match parse_reply(reply, FeedPage::from_json) {
            Ok(page) => {
                if page.channel.is_some() {
                    self.channel = page.channel;
                }
                let new_entries = self.watermark.take_new(page.feeds);
                if new_entries.is_empty() {
                    report::no_new_data(&mut self.out)?;
                    Ok(PollOutcome::NoNewData)
                } else {
                    log::info!(
                        "{} new entries, watermark now {:?}",
                        new_entries.len(),
                        self.watermark.value()
                    );
                    report::new_entries(&mut self.out, &new_entries, self.channel.as_ref())?;
                    Ok(PollOutcome::New(new_entries))
                }
            }
            Err(FetchError::Status { status, body }) => {
                log::warn!("Feed request returned {}", status);
                report::failure(&mut self.out, "Error fetching feeds", body)?;
                Ok(PollOutcome::Failed)
            }
            Err(err) => {
                log::error!("Failed to process feeds with {}", err);
                report::failure(&mut self.out, "Failed to fetch feeds", err)?;
                Ok(PollOutcome::Failed)
            }
        }
    }
}

fn parse_reply<T>(
    reply: ApiReply,
    parse: impl FnOnce(&str) -> serde_json::Result<T>,
) -> Result<T, FetchError> {
    if reply.status != StatusCode::OK {
        return Err(FetchError::Status {
            status: reply.status,
            body: reply.body,
        });
    }
    Ok(parse(&reply.body)?)
}

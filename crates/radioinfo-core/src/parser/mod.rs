//! XML parsers for the schedule API
//!
//! - `channels`: parse `<channel>` elements of the channel listing
//! - `episodes`: parse `<scheduledepisode>` elements of a channel schedule
//!
//! [`ScheduleParser`] walks both listings through the paginated reader and
//! assembles the channel collection of one run.

pub mod channels;
pub mod episodes;

pub use channels::{parse_channel_entry, ChannelEntry};
pub use episodes::{parse_episode_in_window, parse_scheduled_episode};

use futures::TryStreamExt;
use tracing::debug;

use crate::client::RadioClient;
use crate::error::{RadioInfoError, Result};
use crate::pagination::PaginatedReader;
use crate::types::{Channel, Episode};
use crate::window::TimeWindow;

/// Progress signal emitted while channels are parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Total number of channels in the listing; sent once, first
    Started { total: u32 },
    /// Number of channels fully built so far
    Advanced { completed: u32 },
}

/// Builds channels and their in-window episodes from the schedule API
#[derive(Debug, Clone)]
pub struct ScheduleParser {
    reader: PaginatedReader,
}

impl ScheduleParser {
    pub fn new(client: RadioClient) -> Self {
        Self {
            reader: PaginatedReader::new(client),
        }
    }

    /// Read every channel of the listing at `url`, with the episodes of its
    /// schedule that overlap `window`.
    ///
    /// `on_progress` first receives `Started` with the listing's
    /// `totalhits` and `Advanced { completed: 0 }`, then one `Advanced` per
    /// channel once the channel and all of its schedule pages are read.
    ///
    /// # Errors
    /// Any fetch, parse or timestamp error aborts the whole listing; no
    /// partial result is returned.
    pub async fn parse_channels<P>(
        &self,
        url: &str,
        window: TimeWindow,
        mut on_progress: P,
    ) -> Result<Vec<Channel>>
    where
        P: FnMut(Progress) + Send,
    {
        let mut pages = self.reader.pages(url, "channel", parse_channel_entry);
        let mut channels = Vec::new();
        let mut completed = 0u32;

        while let Some(page) = pages.try_next().await? {
            if page.number == 1 {
                let total = page.info.total_hits.ok_or_else(|| {
                    RadioInfoError::ParseError(format!("channel listing {url} has no totalhits"))
                })?;
                on_progress(Progress::Started { total });
                on_progress(Progress::Advanced { completed });
            }

            for entry in page.items {
                let channel = self.build_channel(entry, window).await?;
                debug!(
                    channel = %channel.name,
                    episodes = channel.episodes.len(),
                    "channel complete"
                );
                channels.push(channel);
                completed += 1;
                on_progress(Progress::Advanced { completed });
            }
        }

        Ok(channels)
    }

    /// Read every page of the schedule at `url` and keep the episodes that
    /// overlap `window`, in page order.
    pub async fn parse_episodes(&self, url: &str, window: TimeWindow) -> Result<Vec<Episode>> {
        let mut pages = self.reader.pages(url, "scheduledepisode", move |node| {
            parse_episode_in_window(node, &window)
        });

        let mut episodes = Vec::new();
        while let Some(page) = pages.try_next().await? {
            episodes.extend(page.items.into_iter().flatten());
        }
        Ok(episodes)
    }

    async fn build_channel(&self, entry: ChannelEntry, window: TimeWindow) -> Result<Channel> {
        let mut channel = Channel::new(entry.name, entry.channel_type);
        if let Some(schedule_url) = entry.schedule_url {
            channel.episodes = self.parse_episodes(&schedule_url, window).await?;
        }
        Ok(channel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{channel_page, channel_xml, episode_xml, schedule_page};
    use crate::window::parse_timestamp;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn window() -> TimeWindow {
        TimeWindow::new(
            parse_timestamp("2017-12-04T00:00:00Z").unwrap(),
            parse_timestamp("2017-12-05T00:00:00Z").unwrap(),
        )
    }

    async fn mount(server: &MockServer, route: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(server)
            .await;
    }

    /// Two channel pages; P1 has a two-page schedule, P2 has no schedule,
    /// P3 has a one-page schedule.
    async fn mount_listing(server: &MockServer) -> String {
        let uri = server.uri();
        mount(
            server,
            "/channels",
            channel_page(
                1,
                2,
                3,
                Some(&format!("{uri}/channels/2")),
                &[
                    channel_xml("P1", "Rikskanal", Some(&format!("{uri}/schedule/p1"))),
                    channel_xml("P2", "Rikskanal", None),
                ],
            ),
        )
        .await;
        mount(
            server,
            "/channels/2",
            channel_page(
                2,
                2,
                3,
                None,
                &[channel_xml("P3", "Rikskanal", Some(&format!("{uri}/schedule/p3")))],
            ),
        )
        .await;
        mount(
            server,
            "/schedule/p1",
            schedule_page(
                1,
                2,
                Some(&format!("{uri}/schedule/p1/2")),
                &[
                    episode_xml("Natt", "2017-12-03T20:00:00Z", "2017-12-03T23:00:00Z"),
                    episode_xml("Ekot", "2017-12-04T07:00:00Z", "2017-12-04T07:15:00Z"),
                ],
            ),
        )
        .await;
        mount(
            server,
            "/schedule/p1/2",
            schedule_page(
                2,
                2,
                None,
                &[
                    episode_xml("Ekot", "2017-12-04T12:00:00Z", "2017-12-04T12:15:00Z"),
                    episode_xml("Sent", "2017-12-04T23:30:00Z", "2017-12-05T00:30:00Z"),
                    episode_xml("Imorgon", "2017-12-05T06:00:00Z", "2017-12-05T07:00:00Z"),
                ],
            ),
        )
        .await;
        mount(
            server,
            "/schedule/p3",
            schedule_page(
                1,
                1,
                None,
                &[episode_xml("Musikguiden", "2017-12-04T18:00:00Z", "2017-12-04T20:00:00Z")],
            ),
        )
        .await;
        format!("{uri}/channels")
    }

    #[tokio::test]
    async fn test_parse_channels_across_pages() {
        let server = MockServer::start().await;
        let url = mount_listing(&server).await;

        let parser = ScheduleParser::new(RadioClient::new().unwrap());
        let mut progress = Vec::new();
        let channels = parser
            .parse_channels(&url, window(), |p| progress.push(p))
            .await
            .unwrap();

        let names: Vec<&str> = channels.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["P1", "P2", "P3"]);

        let p1: Vec<&str> = channels[0].episodes.iter().map(|e| e.title.as_str()).collect();
        // duplicates by title are kept, out-of-window episodes dropped
        assert_eq!(p1, vec!["Ekot", "Ekot", "Sent"]);
        assert!(channels[1].episodes.is_empty());
        assert_eq!(channels[2].episodes.len(), 1);
        assert_eq!(channels[2].channel_type.as_deref(), Some("Rikskanal"));

        assert_eq!(
            progress,
            vec![
                Progress::Started { total: 3 },
                Progress::Advanced { completed: 0 },
                Progress::Advanced { completed: 1 },
                Progress::Advanced { completed: 2 },
                Progress::Advanced { completed: 3 },
            ]
        );
    }

    #[tokio::test]
    async fn test_parse_channels_is_repeatable() {
        let server = MockServer::start().await;
        let uri = server.uri();
        Mock::given(method("GET"))
            .and(path("/channels"))
            .respond_with(ResponseTemplate::new(200).set_body_string(channel_page(
                1,
                1,
                1,
                None,
                &[channel_xml("P1", "Rikskanal", Some(&format!("{uri}/schedule/p1")))],
            )))
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/schedule/p1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(schedule_page(
                1,
                1,
                None,
                &[episode_xml("Ekot", "2017-12-04T07:00:00Z", "2017-12-04T07:15:00Z")],
            )))
            .expect(2)
            .mount(&server)
            .await;

        let parser = ScheduleParser::new(RadioClient::new().unwrap());
        let url = format!("{uri}/channels");
        let first = parser.parse_channels(&url, window(), |_| {}).await.unwrap();
        let second = parser.parse_channels(&url, window(), |_| {}).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_malformed_total_pages_aborts() {
        let server = MockServer::start().await;
        let body = "<sr><pagination><page>1</page><totalhits>1</totalhits>\
                    <totalpages>abc</totalpages></pagination>\
                    <channels><channel name=\"P1\"/></channels></sr>";
        mount(&server, "/channels", body.to_string()).await;

        let parser = ScheduleParser::new(RadioClient::new().unwrap());
        let mut progress = Vec::new();
        let result = parser
            .parse_channels(&format!("{}/channels", server.uri()), window(), |p| {
                progress.push(p)
            })
            .await;

        assert!(matches!(result, Err(RadioInfoError::ParseError(msg)) if msg.contains("totalpages")));
        assert!(progress.is_empty());
    }

    #[tokio::test]
    async fn test_missing_total_hits_aborts() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/channels",
            "<sr><channels><channel name=\"P1\"/></channels></sr>".to_string(),
        )
        .await;

        let parser = ScheduleParser::new(RadioClient::new().unwrap());
        let result = parser
            .parse_channels(&format!("{}/channels", server.uri()), window(), |_| {})
            .await;
        assert!(matches!(result, Err(RadioInfoError::ParseError(msg)) if msg.contains("totalhits")));
    }

    #[tokio::test]
    async fn test_schedule_failure_aborts_listing() {
        let server = MockServer::start().await;
        let uri = server.uri();
        mount(
            &server,
            "/channels",
            channel_page(
                1,
                1,
                2,
                None,
                &[
                    channel_xml("P1", "Rikskanal", Some(&format!("{uri}/schedule/p1"))),
                    channel_xml("P2", "Rikskanal", None),
                ],
            ),
        )
        .await;
        mount(
            &server,
            "/schedule/p1",
            schedule_page(
                1,
                1,
                None,
                &[episode_xml("Ekot", "not-a-time", "2017-12-04T07:15:00Z")],
            ),
        )
        .await;

        let parser = ScheduleParser::new(RadioClient::new().unwrap());
        let mut progress = Vec::new();
        let result = parser
            .parse_channels(&format!("{uri}/channels"), window(), |p| progress.push(p))
            .await;

        assert!(matches!(result, Err(RadioInfoError::TimeParseError(_))));
        // P1 never completed, so only the initial signals were sent
        assert_eq!(
            progress,
            vec![Progress::Started { total: 2 }, Progress::Advanced { completed: 0 }]
        );
    }

    #[tokio::test]
    async fn test_unbounded_schedule_link_aborts_listing() {
        let server = MockServer::start().await;
        let uri = server.uri();
        mount(
            &server,
            "/channels",
            channel_page(
                1,
                1,
                1,
                None,
                &[channel_xml("P1", "Rikskanal", Some(&format!("{uri}/schedule/p1")))],
            ),
        )
        .await;
        // The schedule links back to itself and never states a page count.
        mount(
            &server,
            "/schedule/p1",
            format!(
                "<sr><pagination><page>1</page><nextpage>{uri}/schedule/p1</nextpage></pagination>\
                 <schedule>{}</schedule></sr>",
                episode_xml("Ekot", "2017-12-04T07:00:00Z", "2017-12-04T07:15:00Z")
            ),
        )
        .await;

        let parser = ScheduleParser::new(RadioClient::new().unwrap());
        let result = parser
            .parse_channels(&format!("{uri}/channels"), window(), |_| {})
            .await;
        assert!(matches!(result, Err(RadioInfoError::ParseError(msg)) if msg.contains("no totalpages")));
    }

    #[tokio::test]
    async fn test_parse_episodes_single_schedule() {
        let server = MockServer::start().await;
        mount(
            &server,
            "/schedule/p4",
            schedule_page(
                1,
                1,
                None,
                &[
                    episode_xml("Före", "2017-12-03T00:00:00Z", "2017-12-03T23:00:00Z"),
                    episode_xml("Under", "2017-12-04T23:00:00Z", "2017-12-05T01:00:00Z"),
                ],
            ),
        )
        .await;

        let parser = ScheduleParser::new(RadioClient::new().unwrap());
        let episodes = parser
            .parse_episodes(&format!("{}/schedule/p4", server.uri()), window())
            .await
            .unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].title, "Under");
    }
}

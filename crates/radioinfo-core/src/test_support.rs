//! XML fixtures shaped like the schedule API responses

fn pagination(page: u32, total_pages: u32, total_hits: Option<u32>, next: Option<&str>) -> String {
    let hits = total_hits
        .map(|hits| format!("<totalhits>{hits}</totalhits>"))
        .unwrap_or_default();
    let next = next
        .map(|url| format!("<nextpage>{url}</nextpage>"))
        .unwrap_or_default();
    format!(
        "<pagination><page>{page}</page><size>10</size>{hits}\
         <totalpages>{total_pages}</totalpages>{next}</pagination>"
    )
}

pub fn channel_xml(name: &str, channel_type: &str, schedule_url: Option<&str>) -> String {
    let schedule = schedule_url
        .map(|url| format!("<scheduleurl>{url}</scheduleurl>"))
        .unwrap_or_default();
    format!(
        "<channel id=\"1\" name=\"{name}\"><image>https://static-cdn.sr.se/c.png</image>\
         <channeltype>{channel_type}</channeltype>{schedule}</channel>"
    )
}

pub fn channel_page(
    page: u32,
    total_pages: u32,
    total_hits: u32,
    next: Option<&str>,
    channels: &[String],
) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><sr><copyright>Copyright Sveriges Radio 2017.</copyright>{}<channels>{}</channels></sr>",
        pagination(page, total_pages, Some(total_hits), next),
        channels.concat()
    )
}

pub fn episode_xml(title: &str, start: &str, end: &str) -> String {
    format!(
        "<scheduledepisode><episodeid>1</episodeid><title>{title}</title>\
         <description>{title} beskrivning</description>\
         <starttimeutc>{start}</starttimeutc><endtimeutc>{end}</endtimeutc>\
         <program id=\"2\" name=\"{title}\" /><channel id=\"1\" name=\"P1\" />\
         <imageurl>https://static-cdn.sr.se/e.jpg</imageurl></scheduledepisode>"
    )
}

pub fn schedule_page(page: u32, total_pages: u32, next: Option<&str>, episodes: &[String]) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?><sr><copyright>Copyright Sveriges Radio 2017.</copyright>{}<schedule>{}</schedule></sr>",
        pagination(page, total_pages, Some(episodes.len() as u32), next),
        episodes.concat()
    )
}

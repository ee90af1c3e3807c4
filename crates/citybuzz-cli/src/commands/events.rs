use crate::context::CliContext;
use anyhow::Result;
use citybuzz_core::confirm::Confirm;
use citybuzz_core::event::{Event, EventCategory, EventId, RsvpStatus};

fn print_event(event: &Event, rsvp: Option<RsvpStatus>) {
    let mine = rsvp.map(|s| format!("  [{s}]")).unwrap_or_default();
    println!(
        "{}  {}  {}{}",
        event.id,
        event.start_date.format("%Y-%m-%d %H:%M"),
        event.title,
        mine
    );
    println!(
        "    {} · {} going · {} interested",
        event.location, event.going_count, event.interested_count
    );
}

pub async fn list(ctx: &CliContext, category: Option<EventCategory>, trending: Option<u32>) -> Result<()> {
    let events = &ctx.client.events;
    events.refresh(category).await?;
    let state = events.snapshot().await;

    println!("Now in {}", events.city());
    for event in &state.current {
        print_event(event, state.rsvps.get(&event.id).copied());
    }
    println!("Upcoming");
    for event in &state.upcoming {
        print_event(event, state.rsvps.get(&event.id).copied());
    }

    if let Some(limit) = trending {
        println!("Trending");
        for event in events.load_trending(limit).await? {
            print_event(&event, state.rsvps.get(&event.id).copied());
        }
    }
    Ok(())
}

pub async fn rsvp(ctx: &CliContext, event_id: EventId, status: RsvpStatus) -> Result<()> {
    let events = &ctx.client.events;
    events.refresh(None).await?;
    match events.rsvp(event_id, status).await? {
        Some(held) => println!("You are now {held} for {event_id}"),
        None => println!("RSVP cleared for {event_id}"),
    }
    if let Some(event) = events.event(event_id).await {
        print_event(&event, events.rsvp_status(event_id).await);
    }
    Ok(())
}

pub async fn attendees(ctx: &CliContext, event_id: EventId) -> Result<()> {
    let attendees = ctx.client.events.attendees(event_id).await?;
    println!("Going ({})", attendees.going_count);
    for a in &attendees.going {
        println!("  @{}", a.username);
    }
    println!("Interested ({})", attendees.interested_count);
    for a in &attendees.interested {
        println!("  @{}", a.username);
    }
    Ok(())
}

pub async fn delete(ctx: &CliContext, event_id: EventId, confirm: &dyn Confirm) -> Result<()> {
    let events = &ctx.client.events;
    events.refresh(None).await?;
    if events.delete_event(event_id, confirm).await? {
        println!("Deleted {event_id}");
    } else {
        println!("Cancelled");
    }
    Ok(())
}

//! Passive relay between the filter topic and list views.
//!
//! # Design
//! The relay is the only component holding a bus subscription on behalf of
//! its views. It keeps the latest snapshot so a view attached later starts
//! from the current filters. It never edits or re-publishes what it
//! receives. Views are held weakly: unmounting a view is just dropping it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::bus::{MessageBus, Subscription};
use crate::filter::FilterState;
use crate::view::ListView;

pub type SharedListView = Rc<RefCell<ListView>>;

#[derive(Debug, Default)]
struct RelayState {
    latest: FilterState,
    targets: Vec<Weak<RefCell<ListView>>>,
}

impl RelayState {
    fn forward(&mut self, filters: &FilterState) {
        self.latest = filters.clone();
        self.targets.retain(|target| match target.upgrade() {
            Some(view) => {
                view.borrow_mut().receive_filters(filters.clone());
                true
            }
            None => false,
        });
    }
}

#[derive(Debug)]
pub struct FilterSubscriber {
    state: Rc<RefCell<RelayState>>,
    subscription: Subscription,
}

impl FilterSubscriber {
    pub fn connect(bus: &MessageBus<FilterState>, topic: &str) -> Self {
        let state = Rc::new(RefCell::new(RelayState::default()));
        let relay = Rc::clone(&state);
        let subscription = bus.subscribe(topic, move |filters: &FilterState| {
            relay.borrow_mut().forward(filters);
        });
        Self { state, subscription }
    }

    /// Start forwarding to `view`, pushing the current filters right away.
    pub fn attach(&self, view: &SharedListView) {
        let mut state = self.state.borrow_mut();
        view.borrow_mut().receive_filters(state.latest.clone());
        state.targets.push(Rc::downgrade(view));
    }

    pub fn filters(&self) -> FilterState {
        self.state.borrow().latest.clone()
    }

    pub fn attached(&self) -> usize {
        self.state
            .borrow()
            .targets
            .iter()
            .filter(|target| target.strong_count() > 0)
            .count()
    }

    pub fn topic(&self) -> &str {
        self.subscription.topic()
    }

    /// Stop listening. Attached views keep their last filters.
    pub fn disconnect(self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::config::{FormFactor, ViewConfig};
    use crate::filter::SortBy;
    use crate::types::PageResult;

    fn shared(view: ListView) -> SharedListView {
        Rc::new(RefCell::new(view))
    }

    /// Complete the view's pending query with an empty page and `total`.
    fn load(view: &SharedListView, total: usize) {
        let mut view = view.borrow_mut();
        let query = view.poll_query().unwrap();
        view.on_page_loaded(
            query.ticket,
            Ok(PageResult {
                records: Vec::new(),
                total_item_count: total,
            }),
        );
    }

    fn title_sorted() -> FilterState {
        FilterState {
            sort_by: SortBy::TitleAsc,
            ..FilterState::default()
        }
    }

    #[test]
    fn forwards_snapshot_to_every_attached_view() {
        let config = ViewConfig::default();
        let bus = MessageBus::new();
        let relay = FilterSubscriber::connect(&bus, &config.filter_topic);
        let table = shared(ListView::table(&config));
        let cards = shared(ListView::cards(&config, FormFactor::Large));
        relay.attach(&table);
        relay.attach(&cards);

        bus.publish(&config.filter_topic, &title_sorted());

        assert_eq!(table.borrow().filters(), &title_sorted());
        assert_eq!(cards.borrow().filters(), &title_sorted());
        assert_eq!(relay.filters(), title_sorted());
    }

    #[test]
    fn views_keep_independent_pagination() {
        let config = ViewConfig::default();
        let bus = MessageBus::new();
        let relay = FilterSubscriber::connect(&bus, &config.filter_topic);
        let table = shared(ListView::table(&config));
        let cards = shared(ListView::cards(&config, FormFactor::Small));
        relay.attach(&table);
        relay.attach(&cards);
        load(&table, 100);
        load(&cards, 100);

        table.borrow_mut().next_page();
        table.borrow_mut().next_page();
        cards.borrow_mut().next_page();
        table.borrow_mut().set_page_size(30).unwrap();
        table.borrow_mut().next_page();

        assert_eq!(table.borrow().page_number(), 2);
        assert_eq!(cards.borrow().page_number(), 2);

        bus.publish(
            &config.filter_topic,
            &FilterState {
                priorities: Some(BTreeSet::new()),
                types: Some(BTreeSet::new()),
                ..FilterState::default()
            },
        );

        assert_eq!(table.borrow().page_number(), 1);
        assert_eq!(table.borrow().page_size(), 30);
        assert_eq!(cards.borrow().page_number(), 1);
        assert_eq!(cards.borrow().page_size(), 3);
    }

    #[test]
    fn late_attach_starts_from_latest_filters() {
        let config = ViewConfig::default();
        let bus = MessageBus::new();
        let relay = FilterSubscriber::connect(&bus, &config.filter_topic);
        bus.publish(&config.filter_topic, &title_sorted());

        let table = shared(ListView::table(&config));
        relay.attach(&table);
        let query = table.borrow_mut().poll_query().unwrap();
        assert_eq!(query.request.filters, title_sorted());
    }

    #[test]
    fn dropped_views_are_pruned() {
        let config = ViewConfig::default();
        let bus = MessageBus::new();
        let relay = FilterSubscriber::connect(&bus, &config.filter_topic);
        let table = shared(ListView::table(&config));
        relay.attach(&table);
        assert_eq!(relay.attached(), 1);

        drop(table);
        assert_eq!(relay.attached(), 0);
        bus.publish(&config.filter_topic, &title_sorted());
        assert_eq!(bus.subscriber_count(relay.topic()), 1);
    }

    #[test]
    fn disconnect_releases_subscription() {
        let config = ViewConfig::default();
        let bus = MessageBus::new();
        let relay = FilterSubscriber::connect(&bus, &config.filter_topic);
        relay.disconnect();
        assert_eq!(bus.subscriber_count(&config.filter_topic), 0);
    }
}

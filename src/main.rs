use leptos::prelude::*;
use netdiagram::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}

// Bulk Delete - delete mail by author, address or domain
// Copyright (C) 2026  Asa V. Schaeffer
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod bridge;
mod bulk;
mod config;
mod error;
mod host;
mod imap;
mod state;
mod status;
mod ui;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();

    let config = config::PopupConfig::from_env();
    tracing::info!("Starting with {:?}", config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 460.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bulk Delete",
        options,
        Box::new(move |cc| Ok(Box::new(app::BulkDeleteApp::new(cc, &config)))),
    )
}

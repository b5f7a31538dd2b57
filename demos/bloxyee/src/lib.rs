use wasm_bindgen::prelude::*;

mod game;
use game::Bloxyee;

tinsel_web::export_game!(Bloxyee, "bloxyee");

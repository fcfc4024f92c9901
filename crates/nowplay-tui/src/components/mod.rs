pub mod track_card;

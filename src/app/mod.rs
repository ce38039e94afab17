pub mod authenticity_service;

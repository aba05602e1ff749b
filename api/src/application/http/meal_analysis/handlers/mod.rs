pub mod upload_meal;

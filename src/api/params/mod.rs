pub mod upload_params;

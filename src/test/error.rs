#[cfg(test)]
mod tests {
    use rocket::http::Status;

    use crate::clock::ClockError;
    use crate::error::AppError;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            AppError::NotFound("sched_x".to_string()).status_code(),
            Status::NotFound
        );
        assert_eq!(
            AppError::Internal("oops".to_string()).status_code(),
            Status::InternalServerError
        );
    }

    #[test]
    fn test_validation_errors_answer_unprocessable_entity() {
        // Same status as the validator-driven rejections in the API.
        let err = AppError::from(ClockError::Duration);
        assert_eq!(err.status_code(), Status::UnprocessableEntity);
    }
}

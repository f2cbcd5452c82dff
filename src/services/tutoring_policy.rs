use crate::db::models::User;

/// Who may message whom. Students reach only their assigned tutor, tutors
/// reach only their own tutees, and every other role is rejected outright.
pub(crate) fn can_message(sender: &User, receiver: &User) -> Result<(), &'static str> {
    if sender.is_student() {
        if sender.tutor_id == Some(receiver.id) {
            Ok(())
        } else {
            Err("Solo puedes enviar mensajes a tu tutor")
        }
    } else if sender.is_teacher() {
        if receiver.tutor_id == Some(sender.id) {
            Ok(())
        } else {
            Err("Solo puedes enviar mensajes a tus estudiantes bajo tutoría")
        }
    } else {
        Err("Rol no autorizado")
    }
}

pub(crate) fn can_assign_task(tutor: &User, student: &User) -> Result<(), &'static str> {
    if student.tutor_id == Some(tutor.id) {
        Ok(())
    } else {
        Err("Solo puedes asignar tareas a tus estudiantes bajo tutoría")
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;
    use crate::db::types::RoleName;

    fn user(id: i64, role: RoleName, tutor_id: Option<i64>) -> User {
        let now = datetime!(2026-01-10 12:00);
        User {
            id,
            email: format!("user{id}@example.com"),
            password_hash: "hash".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: None,
            document_type: None,
            document_number: None,
            birth_date: None,
            institution: None,
            grade: None,
            avatar_url: None,
            is_active: true,
            role_id: 1,
            tutor_id,
            created_at: now,
            updated_at: now,
            last_login: None,
            role_name: role,
            role_description: None,
            tutor_first_name: None,
            tutor_last_name: None,
            tutor_email: None,
        }
    }

    #[test]
    fn student_messages_own_tutor() {
        let tutor = user(7, RoleName::Docente, None);
        let student = user(3, RoleName::Estudiante, Some(7));
        assert!(can_message(&student, &tutor).is_ok());
    }

    #[test]
    fn student_cannot_message_other_teacher() {
        let stranger = user(9, RoleName::Docente, None);
        let student = user(3, RoleName::Estudiante, Some(7));
        assert_eq!(can_message(&student, &stranger), Err("Solo puedes enviar mensajes a tu tutor"));
    }

    #[test]
    fn student_without_tutor_cannot_message() {
        let tutor = user(7, RoleName::Docente, None);
        let student = user(3, RoleName::Estudiante, None);
        assert!(can_message(&student, &tutor).is_err());
    }

    #[test]
    fn teacher_messages_own_tutee() {
        let tutor = user(7, RoleName::Docente, None);
        let student = user(3, RoleName::Estudiante, Some(7));
        assert!(can_message(&tutor, &student).is_ok());
    }

    #[test]
    fn teacher_cannot_message_foreign_student() {
        let tutor = user(7, RoleName::Docente, None);
        let other_student = user(4, RoleName::Estudiante, Some(8));
        assert_eq!(
            can_message(&tutor, &other_student),
            Err("Solo puedes enviar mensajes a tus estudiantes bajo tutoría")
        );
    }

    #[test]
    fn admin_role_is_rejected() {
        let admin = user(1, RoleName::Admin, None);
        let student = user(3, RoleName::Estudiante, Some(7));
        assert_eq!(can_message(&admin, &student), Err("Rol no autorizado"));
    }

    #[test]
    fn task_assignment_requires_tutorship() {
        let tutor = user(7, RoleName::Docente, None);
        let tutee = user(3, RoleName::Estudiante, Some(7));
        let foreign = user(4, RoleName::Estudiante, Some(8));

        assert!(can_assign_task(&tutor, &tutee).is_ok());
        assert_eq!(
            can_assign_task(&tutor, &foreign),
            Err("Solo puedes asignar tareas a tus estudiantes bajo tutoría")
        );
    }
}

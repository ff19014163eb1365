pub const UI_HTML: &str = r##"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Fire Incident Mini-Portal</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: #f5f7fa;
            color: #333;
        }
        .nav {
            background: #c0392b;
            color: white;
            padding: 16px 0;
            margin-bottom: 30px;
        }
        .nav .container {
            display: flex;
            justify-content: space-between;
            align-items: center;
        }
        .nav a {
            color: white;
            margin-left: 20px;
            text-decoration: none;
            opacity: 0.8;
        }
        .nav a.active {
            opacity: 1;
            font-weight: bold;
        }
        .container {
            max-width: 900px;
            margin: 0 auto;
            padding: 0 20px;
        }
        .form-container, .incident-card {
            background: white;
            border-radius: 12px;
            padding: 20px;
            box-shadow: 0 4px 6px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        .form-group {
            margin-bottom: 15px;
        }
        .form-group label {
            display: block;
            font-weight: bold;
            margin-bottom: 5px;
        }
        .form-group input, .form-group textarea, .form-group select {
            width: 100%;
            padding: 8px;
            border: 1px solid #ccc;
            border-radius: 6px;
        }
        .btn {
            background: #c0392b;
            color: white;
            border: none;
            border-radius: 6px;
            padding: 10px 20px;
            cursor: pointer;
        }
        .btn:disabled {
            opacity: 0.6;
        }
        .error {
            color: #e74c3c;
            margin: 8px 0;
        }
        .success-message {
            color: #27ae60;
            margin: 8px 0;
        }
        .incident-header {
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-bottom: 10px;
        }
        .badge {
            padding: 4px 12px;
            border-radius: 20px;
            color: white;
            font-size: 0.85em;
        }
        .badge-Fire { background: #e74c3c; }
        .badge-Smoke { background: #7f8c8d; }
        .badge-Emergency { background: #f39c12; }
        .meta {
            color: #7f8c8d;
            font-size: 0.9em;
            margin-top: 8px;
        }
        .incident-card img {
            max-width: 100%;
            border-radius: 8px;
            margin-top: 10px;
        }
        .hidden {
            display: none;
        }
    </style>
</head>
<body>
    <nav class="nav">
        <div class="container">
            <h1>Fire Incident Mini-Portal</h1>
            <div>
                <a href="#/" id="nav-create">Create Incident</a>
                <a href="#/incidents" id="nav-list">View Incidents</a>
            </div>
        </div>
    </nav>

    <div class="container">
        <section id="create-view">
            <h2>Create New Incident</h2>
            <div id="create-success" class="success-message"></div>
            <div id="create-error" class="error"></div>
            <form id="create-form" class="form-container">
                <div class="form-group">
                    <label for="title">Title *</label>
                    <input type="text" id="title" name="title" placeholder="Enter incident title">
                </div>
                <div class="form-group">
                    <label for="description">Description</label>
                    <textarea id="description" name="description" placeholder="Enter incident description (optional)"></textarea>
                </div>
                <div class="form-group">
                    <label for="incident_type">Incident Type *</label>
                    <select id="incident_type" name="incident_type">
                        <option value="">Select incident type</option>
                        <option value="Fire">Fire</option>
                        <option value="Smoke">Smoke</option>
                        <option value="Emergency">Emergency</option>
                    </select>
                </div>
                <div class="form-group">
                    <label for="location">Location</label>
                    <input type="text" id="location" name="location" placeholder="Enter location (optional)">
                </div>
                <div class="form-group">
                    <label for="image">Image</label>
                    <input type="file" id="image" name="image" accept="image/*">
                </div>
                <button type="submit" class="btn" id="submit-btn">Create Incident</button>
            </form>
        </section>

        <section id="list-view" class="hidden">
            <h2>Incidents</h2>
            <div id="list-error" class="error"></div>
            <div id="incidents"></div>
        </section>
    </div>

    <script>
        const MAX_IMAGE_BYTES = 5 * 1024 * 1024;

        function escapeHtml(value) {
            const div = document.createElement('div');
            div.textContent = value == null ? '' : String(value);
            return div.innerHTML;
        }

        function showView() {
            const onList = location.hash === '#/incidents';
            document.getElementById('create-view').classList.toggle('hidden', onList);
            document.getElementById('list-view').classList.toggle('hidden', !onList);
            document.getElementById('nav-create').classList.toggle('active', !onList);
            document.getElementById('nav-list').classList.toggle('active', onList);
            if (onList) {
                loadIncidents();
            }
        }

        async function loadIncidents() {
            const errorBox = document.getElementById('list-error');
            const list = document.getElementById('incidents');
            try {
                const response = await fetch('/api/incidents');
                if (!response.ok) {
                    throw new Error('HTTP ' + response.status);
                }
                const incidents = await response.json();
                errorBox.textContent = '';
                if (incidents.length === 0) {
                    list.innerHTML = '<p>No incidents reported yet.</p>';
                    return;
                }
                list.innerHTML = incidents.map(incident => `
                    <div class="incident-card">
                        <div class="incident-header">
                            <h3>${escapeHtml(incident.title)}</h3>
                            <span class="badge badge-${escapeHtml(incident.incident_type)}">${escapeHtml(incident.incident_type)}</span>
                        </div>
                        ${incident.description ? `<p>${escapeHtml(incident.description)}</p>` : ''}
                        ${incident.image ? `<img src="/uploads/${encodeURIComponent(incident.image)}" alt="Incident image">` : ''}
                        <div class="meta">
                            ${incident.location ? escapeHtml(incident.location) + ' &middot; ' : ''}
                            ${escapeHtml(new Date(incident.created_at).toLocaleString())}
                        </div>
                    </div>
                `).join('');
            } catch (err) {
                console.error('Error fetching incidents:', err);
                errorBox.textContent = 'Failed to load incidents. Please try again.';
            }
        }

        document.getElementById('create-form').addEventListener('submit', async (event) => {
            event.preventDefault();
            const form = event.target;
            const errorBox = document.getElementById('create-error');
            const successBox = document.getElementById('create-success');
            const button = document.getElementById('submit-btn');
            errorBox.textContent = '';
            successBox.textContent = '';

            const file = form.image.files[0];
            if (!form.title.value.trim()) {
                errorBox.textContent = 'Title is required';
                return;
            }
            if (!form.incident_type.value) {
                errorBox.textContent = 'Incident type is required';
                return;
            }
            if (file && file.size > MAX_IMAGE_BYTES) {
                errorBox.textContent = 'Image size must be less than 5MB';
                return;
            }

            button.disabled = true;
            button.textContent = 'Creating...';
            try {
                const response = await fetch('/api/incidents', {
                    method: 'POST',
                    body: new FormData(form),
                });
                const body = await response.json().catch(() => ({}));
                if (!response.ok) {
                    errorBox.textContent = body.error || 'Failed to create incident. Please try again.';
                    return;
                }
                successBox.textContent = 'Incident created successfully!';
                form.reset();
                setTimeout(() => { location.hash = '#/incidents'; }, 2000);
            } catch (err) {
                console.error('Error creating incident:', err);
                errorBox.textContent = 'Failed to create incident. Please try again.';
            } finally {
                button.disabled = false;
                button.textContent = 'Create Incident';
            }
        });

        window.addEventListener('hashchange', showView);
        showView();
    </script>
</body>
</html>
"##;
